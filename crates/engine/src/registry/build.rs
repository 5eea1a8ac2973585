use std::any::Any;
use std::sync::Arc;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use super::{DuplicateRegistration, ValidatorRegistry};
use crate::type_key::{Owner, TypeKey};
use crate::validator::{Validator, ValidatorDecl};

/// Builder for constructing a [`ValidatorRegistry`].
pub struct RegistryBuilder<O> {
	label: &'static str,
	owner: Owner,
	decls: Vec<ValidatorDecl<O>>,
}

impl<O: Any> RegistryBuilder<O> {
	/// Creates a new builder with the given label for diagnostics.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			owner: Owner::of::<O>(),
			decls: Vec::new(),
		}
	}

	/// Reports `owner` instead of `O` in diagnostics and to class-bound
	/// validators.
	pub fn owned_by(mut self, owner: Owner) -> Self {
		self.owner = owner;
		self
	}

	/// Returns the number of declarations pushed so far.
	pub fn len(&self) -> usize {
		self.decls.len()
	}

	/// Returns true if nothing has been declared yet.
	pub fn is_empty(&self) -> bool {
		self.decls.is_empty()
	}

	/// Adds a single declaration.
	pub fn push(&mut self, decl: ValidatorDecl<O>) {
		self.decls.push(decl);
	}

	/// Chaining form of [`Self::push`].
	pub fn with(mut self, decl: ValidatorDecl<O>) -> Self {
		self.push(decl);
		self
	}

	/// Adds multiple declarations.
	pub fn extend<I: IntoIterator<Item = ValidatorDecl<O>>>(&mut self, decls: I) {
		self.decls.extend(decls);
	}

	/// Groups declarations by claimed key and freezes the result.
	///
	/// A declaration whose name already claimed a key is dropped for that key
	/// and recorded in [`ValidatorRegistry::duplicates`].
	pub fn build(self) -> ValidatorRegistry<O> {
		let label = self.label;
		let mut groups: HashMap<TypeKey, Vec<Arc<Validator<O>>>> = HashMap::default();
		let mut seen: HashSet<(TypeKey, &'static str)> = HashSet::default();
		let mut distinct: HashSet<&'static str> = HashSet::default();
		let mut duplicates = Vec::new();

		for decl in self.decls {
			let name = decl.validator.name();
			if decl.keys.is_empty() {
				tracing::debug!(registry = label, validator = name, "validator claims no type keys");
				continue;
			}

			let validator = Arc::new(decl.validator);
			for key in decl.keys {
				if !seen.insert((key, name)) {
					tracing::warn!(
						registry = label,
						validator = name,
						key = %key,
						"duplicate validator registration ignored"
					);
					duplicates.push(DuplicateRegistration {
						registry: label,
						key,
						name,
					});
					continue;
				}
				distinct.insert(name);
				groups.entry(key).or_default().push(Arc::clone(&validator));
			}
		}

		tracing::trace!(
			registry = label,
			keys = groups.len(),
			validators = distinct.len(),
			"validator registry built"
		);

		ValidatorRegistry {
			label,
			owner: self.owner,
			groups: groups
				.into_iter()
				.map(|(key, group)| (key, Arc::from(group)))
				.collect(),
			distinct: distinct.len(),
			duplicates: Arc::from(duplicates),
		}
	}
}
