//! Per-instance memo of known validator failures.
//!
//! Keyed by `(validator name, input value)`, comparing inputs by value rather
//! than identity. Entries are only written for cache-enabled validators, only
//! on failure, and live as long as the cache itself: there is no expiry, no
//! capacity bound and no invalidation. This relies on validators being
//! deterministic in their single input; a validator that also reads instance
//! state can see a stale entry once that state changes.
//!
//! Inputs need not be hashable, so entries are bucketed by validator name and
//! scanned linearly within a bucket.

use rustc_hash::FxHashMap as HashMap;

use crate::failure::FailedValidation;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct FailureCache {
	entries: HashMap<&'static str, Vec<(Value, FailedValidation)>>,
	len: usize,
}

impl FailureCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the failure previously recorded for `validator` on an input
	/// equal to `input`.
	pub fn get(&self, validator: &str, input: &Value) -> Option<&FailedValidation> {
		self.entries
			.get(validator)?
			.iter()
			.find(|(cached, _)| cached.value_eq(input))
			.map(|(_, failure)| failure)
	}

	/// Records a failure, replacing any entry for an equal input.
	pub fn insert(&mut self, validator: &'static str, input: Value, failure: FailedValidation) {
		let bucket = self.entries.entry(validator).or_default();
		match bucket.iter_mut().find(|(cached, _)| cached.value_eq(&input)) {
			Some(entry) => entry.1 = failure,
			None => {
				bucket.push((input, failure));
				self.len += 1;
			}
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}
