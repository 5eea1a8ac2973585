//! Dispatch: resolve a validator group and try its candidates.
//!
//! Two flavors share one candidate loop:
//!
//! - [`resolve_and_validate`] validates a single value (objects, attributes).
//! - [`resolve_and_validate_pair`] validates a mapping entry, either through a
//!   joint group for the exact `(key type, value type)` pair or by resolving
//!   the key and the value independently.
//!
//! Dispatch is synchronous. Candidates run one after the other on the calling
//! thread and the first success is returned without invoking the rest.

mod pair;
mod single;

pub use pair::resolve_and_validate_pair;
pub use single::resolve_and_validate;

/// Which sides of a mapping entry go through validation.
///
/// A disabled side bypasses dispatch and forwards the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PairPolicy {
	pub validate_keys: bool,
	pub validate_values: bool,
}

impl PairPolicy {
	/// Validates both keys and values.
	pub const BOTH: Self = Self {
		validate_keys: true,
		validate_values: true,
	};

	pub const fn new(validate_keys: bool, validate_values: bool) -> Self {
		Self {
			validate_keys,
			validate_values,
		}
	}
}

impl Default for PairPolicy {
	fn default() -> Self {
		Self::BOTH
	}
}


#[cfg(test)]
mod props;
