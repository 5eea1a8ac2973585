use std::any::Any;
use std::sync::Arc;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use super::{DuplicateRegistration, RegistryBuilder, ValidatorRegistry};
use crate::type_key::{ConcreteType, Owner, TypeKey};
use crate::validator::{PairValidator, PairValidatorDecl, ValidatorDecl};

type PairKey = (ConcreteType, ConcreteType);

/// Registries for a mapping type: key-only, value-only and joint key/value.
///
/// A joint group for an entry's exact `(key type, value type)` pair takes
/// precedence over independent key and value resolution.
pub struct MappingRegistry<O> {
	keys: ValidatorRegistry<O>,
	values: ValidatorRegistry<O>,
	joint: HashMap<PairKey, Arc<[Arc<PairValidator<O>>]>>,
	joint_duplicates: Arc<[DuplicateRegistration]>,
}

impl<O> MappingRegistry<O> {
	#[inline]
	pub fn owner(&self) -> Owner {
		self.keys.owner()
	}

	#[inline]
	pub fn label(&self) -> &'static str {
		self.keys.label()
	}

	/// Key-only validators.
	#[inline]
	pub fn keys(&self) -> &ValidatorRegistry<O> {
		&self.keys
	}

	/// Value-only validators.
	#[inline]
	pub fn values(&self) -> &ValidatorRegistry<O> {
		&self.values
	}

	/// Joint validators registered for exactly `(key, value)`.
	pub fn joint(&self, key: ConcreteType, value: ConcreteType) -> Option<&[Arc<PairValidator<O>>]> {
		self.joint.get(&(key, value)).map(|group| &**group)
	}

	/// Number of `(key type, value type)` pairs with joint validators.
	pub fn joint_len(&self) -> usize {
		self.joint.len()
	}

	/// Joint declarations dropped during build. The key of each record is the
	/// pair's key type; key-only and value-only duplicates are on
	/// [`Self::keys`] and [`Self::values`].
	pub fn joint_duplicates(&self) -> &[DuplicateRegistration] {
		&self.joint_duplicates
	}
}

impl<O> std::fmt::Debug for MappingRegistry<O> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MappingRegistry")
			.field("keys", &self.keys)
			.field("values", &self.values)
			.field("joint", &self.joint.len())
			.finish()
	}
}

/// Builder for a [`MappingRegistry`].
pub struct MappingRegistryBuilder<O> {
	label: &'static str,
	keys: RegistryBuilder<O>,
	values: RegistryBuilder<O>,
	joint: Vec<PairValidatorDecl<O>>,
}

impl<O: Any> MappingRegistryBuilder<O> {
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			keys: RegistryBuilder::new(label),
			values: RegistryBuilder::new(label),
			joint: Vec::new(),
		}
	}

	/// Reports `owner` instead of `O`; see [`RegistryBuilder::owned_by`].
	pub fn owned_by(mut self, owner: Owner) -> Self {
		self.keys = self.keys.owned_by(owner);
		self.values = self.values.owned_by(owner);
		self
	}

	/// Adds a key-only validator.
	pub fn key(mut self, decl: ValidatorDecl<O>) -> Self {
		self.keys.push(decl);
		self
	}

	/// Adds a value-only validator.
	pub fn value(mut self, decl: ValidatorDecl<O>) -> Self {
		self.values.push(decl);
		self
	}

	/// Adds a joint key/value validator.
	pub fn joint(mut self, decl: PairValidatorDecl<O>) -> Self {
		self.joint.push(decl);
		self
	}

	pub fn build(self) -> MappingRegistry<O> {
		let label = self.label;
		let mut joint: HashMap<PairKey, Vec<Arc<PairValidator<O>>>> = HashMap::default();
		let mut seen: HashSet<(PairKey, &'static str)> = HashSet::default();
		let mut duplicates = Vec::new();

		for decl in self.joint {
			let name = decl.validator.name();
			let validator = Arc::new(decl.validator);
			for pair in decl.pairs {
				if !seen.insert((pair, name)) {
					tracing::warn!(
						registry = label,
						validator = name,
						key = %pair.0,
						value = %pair.1,
						"duplicate joint validator registration ignored"
					);
					duplicates.push(DuplicateRegistration {
						registry: label,
						key: TypeKey::Concrete(pair.0),
						name,
					});
					continue;
				}
				joint.entry(pair).or_default().push(Arc::clone(&validator));
			}
		}

		MappingRegistry {
			keys: self.keys.build(),
			values: self.values.build(),
			joint: joint
				.into_iter()
				.map(|(pair, group)| (pair, Arc::from(group)))
				.collect(),
			joint_duplicates: Arc::from(duplicates),
		}
	}
}
