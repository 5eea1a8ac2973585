//! Frozen validator registries.
//!
//! # Purpose
//!
//! A registry maps [`TypeKey`]s to the validators that claimed them. It is
//! built once per owner, when the owner is defined, and is immutable
//! afterwards, so any number of validating instances can share it.
//!
//! # Mental Model
//!
//! 1. **Build Phase:** [`RegistryBuilder`] ingests [`ValidatorDecl`]s and
//!    groups each validator under every key it claims.
//! 2. **Freeze:** [`RegistryBuilder::build`] produces a [`ValidatorRegistry`]
//!    whose groups are shared slices.
//! 3. **Lookup:** [`ValidatorRegistry::resolve`] returns the exact group for a
//!    type, or the wildcard group when none exists.
//!
//! Mappings combine three registries in a [`MappingRegistry`]: key-only,
//! value-only and joint key/value.
//!
//! # Invariants
//!
//! - Group membership has set semantics: one entry per (key, name).
//!   - Enforced in: [`RegistryBuilder::build`].
//!   - Failure symptom: a validator is invoked twice and reported twice.
//! - Groups are never empty; a type with no validators has no group.
//! - Order within a group is unspecified.
//!
//! [`ValidatorDecl`]: crate::validator::ValidatorDecl

use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

use crate::type_key::{ConcreteType, Owner, TypeKey};
use crate::validator::Validator;

mod build;
mod mapping;

pub use build::RegistryBuilder;
pub use mapping::{MappingRegistry, MappingRegistryBuilder};

/// A declaration dropped because the same name already claimed the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateRegistration {
	pub registry: &'static str,
	pub key: TypeKey,
	pub name: &'static str,
}

/// Immutable mapping from type keys to validator groups.
pub struct ValidatorRegistry<O> {
	label: &'static str,
	owner: Owner,
	groups: HashMap<TypeKey, Arc<[Arc<Validator<O>>]>>,
	distinct: usize,
	duplicates: Arc<[DuplicateRegistration]>,
}

impl<O> ValidatorRegistry<O> {
	/// Label given to the builder, used in diagnostics.
	#[inline]
	pub fn label(&self) -> &'static str {
		self.label
	}

	#[inline]
	pub fn owner(&self) -> Owner {
		self.owner
	}

	/// Returns the group registered under exactly `key`.
	pub fn group(&self, key: &TypeKey) -> Option<&[Arc<Validator<O>>]> {
		self.groups.get(key).map(|group| &**group)
	}

	/// Resolves the group for an input of type `ty`: the exact group if one
	/// exists, else the wildcard group. Returns the key that matched.
	pub fn resolve(&self, ty: ConcreteType) -> Option<(TypeKey, &[Arc<Validator<O>>])> {
		let exact = TypeKey::Concrete(ty);
		if let Some(group) = self.group(&exact) {
			return Some((exact, group));
		}
		self.group(&TypeKey::Wildcard)
			.map(|group| (TypeKey::Wildcard, group))
	}

	/// Keys that have a group.
	pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
		self.groups.keys().copied()
	}

	/// Number of distinct validators reachable through any key.
	#[inline]
	pub fn len(&self) -> usize {
		self.distinct
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.distinct == 0
	}

	/// Declarations dropped during build, for diagnostics.
	#[inline]
	pub fn duplicates(&self) -> &[DuplicateRegistration] {
		&self.duplicates
	}
}

impl<O> std::fmt::Debug for ValidatorRegistry<O> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ValidatorRegistry")
			.field("label", &self.label)
			.field("owner", &self.owner.name())
			.field("keys", &self.groups.len())
			.field("validators", &self.distinct)
			.finish()
	}
}
