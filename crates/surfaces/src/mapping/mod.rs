//! Validated mappings.
//!
//! A [`ValidatedMapping`] is an insertion-ordered map whose every entry went
//! through [`resolve_and_validate_pair`] before being stored. Inputs are
//! arbitrary [`Value`]s; the accepted key and value must come out as the
//! schema's stored types.
//!
//! Insertion is all-or-nothing: a rejected entry leaves the map exactly as it
//! was.

use std::any::{Any, type_name};
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use vetted_engine::{
	FailedValidation, FailureAggregate, FailureRecord, MappingRegistry, MappingRegistryBuilder,
	Owner, Side, Validatable, ValidationResult, Value, resolve_and_validate_pair,
};

/// Which sides of an entry are validated.
pub use vetted_engine::PairPolicy as MappingPolicy;

/// Describes a family of validated mappings.
///
/// Instance-bound validators receive the [`ValidatedMapping`] being written
/// to, so they can see its current entries and reach per-mapping settings
/// through [`ValidatedMapping::schema`].
pub trait MappingSchema: Sized + 'static {
	type Key: Hash + Eq + Clone + fmt::Debug + Send + Sync + 'static;
	type Value: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

	/// Usually built with [`ValidatedMapping::registry_builder`].
	fn registry() -> &'static MappingRegistry<ValidatedMapping<Self>>;

	fn policy(&self) -> MappingPolicy {
		MappingPolicy::BOTH
	}
}

pub struct ValidatedMapping<S: MappingSchema> {
	schema: S,
	entries: IndexMap<S::Key, S::Value>,
}

impl<S: MappingSchema> ValidatedMapping<S> {
	pub fn new(schema: S) -> Self {
		Self {
			schema,
			entries: IndexMap::new(),
		}
	}

	/// Builds a mapping from `entries`, validating each one in order.
	///
	/// Stops at the first rejected entry.
	pub fn with_entries<I>(schema: S, entries: I) -> ValidationResult<Self>
	where
		I: IntoIterator<Item = (Value, Value)>,
	{
		let mut mapping = Self::new(schema);
		for (key, value) in entries {
			mapping.insert_value(key, value)?;
		}
		Ok(mapping)
	}

	/// Starts a registry for mappings of schema `S`, reported as `S` in
	/// diagnostics.
	pub fn registry_builder(label: &'static str) -> MappingRegistryBuilder<Self> {
		MappingRegistryBuilder::new(label).owned_by(Owner::of::<S>())
	}

	#[inline]
	pub fn schema(&self) -> &S {
		&self.schema
	}

	/// Validates an entry against the mapping's current state without
	/// storing it.
	pub fn validate(&self, key: Value, value: Value) -> ValidationResult<(S::Key, S::Value)> {
		let registry = S::registry();
		let (key, value) = resolve_and_validate_pair(registry, self, key, value, self.schema.policy())?;

		let owner = registry.owner();
		match (
			downcast_side::<S::Key>(owner, Side::Key, key),
			downcast_side::<S::Value>(owner, Side::Value, value),
		) {
			(Ok(key), Ok(value)) => Ok((key, value)),
			(key, value) => {
				let mut aggregate = FailureAggregate::new();
				for record in [key.err(), value.err()].into_iter().flatten() {
					aggregate.push(record);
				}
				Err(aggregate.into_failure())
			}
		}
	}

	/// Validates and stores an entry, returning the value it replaced.
	///
	/// Replacing an existing key keeps the entry's position.
	pub fn insert<K, V>(&mut self, key: K, value: V) -> ValidationResult<Option<S::Value>>
	where
		K: Validatable,
		V: Validatable,
	{
		self.insert_value(Value::new(key), Value::new(value))
	}

	pub fn insert_value(&mut self, key: Value, value: Value) -> ValidationResult<Option<S::Value>> {
		let (key, value) = self.validate(key, value)?;
		tracing::trace!(
			schema = %Owner::of::<S>(),
			key = ?key,
			"storing validated entry"
		);
		Ok(self.entries.insert(key, value))
	}

	pub fn get(&self, key: &S::Key) -> Option<&S::Value> {
		self.entries.get(key)
	}

	/// Removes an entry, preserving the order of the remaining ones.
	pub fn remove(&mut self, key: &S::Key) -> Option<S::Value> {
		self.entries.shift_remove(key)
	}

	pub fn contains_key(&self, key: &S::Key) -> bool {
		self.entries.contains_key(key)
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> indexmap::map::Iter<'_, S::Key, S::Value> {
		self.entries.iter()
	}

	pub fn keys(&self) -> indexmap::map::Keys<'_, S::Key, S::Value> {
		self.entries.keys()
	}

	pub fn values(&self) -> indexmap::map::Values<'_, S::Key, S::Value> {
		self.entries.values()
	}
}

impl<'a, S: MappingSchema> IntoIterator for &'a ValidatedMapping<S> {
	type Item = (&'a S::Key, &'a S::Value);
	type IntoIter = indexmap::map::Iter<'a, S::Key, S::Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<S: MappingSchema + fmt::Debug> fmt::Debug for ValidatedMapping<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValidatedMapping")
			.field("schema", &self.schema)
			.field("entries", &self.entries)
			.finish()
	}
}

/// An accepted side that is not the stored type is reported like any other
/// side failure.
fn downcast_side<T: Any>(owner: Owner, side: Side, accepted: Value) -> Result<T, FailureRecord> {
	accepted.downcast::<T>().map_err(|accepted| {
		let failure = FailedValidation::type_mismatch(type_name::<T>(), accepted.type_name());
		FailureRecord::new(
			format!("{}.validate", owner.short_name()),
			format!("{side}={accepted:?}"),
			failure,
		)
		.on_side(side)
	})
}

#[cfg(test)]
mod tests;
