//! Validator declarations: the input to registry construction.
//!
//! A declaration is the tuple `(name, binding, claimed type keys, cache flag,
//! callable)`. Typed constructors claim `Concrete(T)` for the input type they
//! take and downcast the dispatched [`Value`]; erased constructors take the
//! raw [`Value`] and claim keys explicitly.

use std::any::{Any, type_name};

use smallvec::SmallVec;

use super::{PairValidator, PairValidatorFn, ValidationResult, Validator, ValidatorFn};
use crate::failure::FailedValidation;
use crate::type_key::{ConcreteType, Owner, TypeKey};
use crate::value::{Validatable, Value};

fn downcast_input<T: Any>(input: &Value) -> ValidationResult<&T> {
	input
		.downcast_ref::<T>()
		.ok_or_else(|| FailedValidation::type_mismatch(type_name::<T>(), input.type_name()))
}

/// Declaration of a single-input validator.
pub struct ValidatorDecl<O> {
	pub(crate) validator: Validator<O>,
	pub(crate) keys: SmallVec<[TypeKey; 2]>,
}

impl<O: 'static> ValidatorDecl<O> {
	/// Declares an erased validator that claims no keys yet.
	pub fn erased(name: &'static str, func: ValidatorFn<O>) -> Self {
		Self {
			validator: Validator::new(name, func),
			keys: SmallVec::new(),
		}
	}

	/// Instance-bound validator for inputs of type `T`.
	pub fn instance_bound<T, R>(
		name: &'static str,
		f: impl Fn(&O, &T) -> ValidationResult<R> + Send + Sync + 'static,
	) -> Self
	where
		T: Any,
		R: Validatable,
	{
		let func = ValidatorFn::instance(move |instance: &O, input: &Value| {
			f(instance, downcast_input::<T>(input)?).map(Value::new)
		});
		Self::erased(name, func).claim_type::<T>()
	}

	/// Class-bound validator for inputs of type `T`.
	pub fn class_bound<T, R>(
		name: &'static str,
		f: impl Fn(&Owner, &T) -> ValidationResult<R> + Send + Sync + 'static,
	) -> Self
	where
		T: Any,
		R: Validatable,
	{
		let func = ValidatorFn::class(move |owner: &Owner, input: &Value| {
			f(owner, downcast_input::<T>(input)?).map(Value::new)
		});
		Self::erased(name, func).claim_type::<T>()
	}

	/// Static validator for inputs of type `T`.
	pub fn static_bound<T, R>(
		name: &'static str,
		f: impl Fn(&T) -> ValidationResult<R> + Send + Sync + 'static,
	) -> Self
	where
		T: Any,
		R: Validatable,
	{
		let func = ValidatorFn::static_bound(move |input: &Value| {
			f(downcast_input::<T>(input)?).map(Value::new)
		});
		Self::erased(name, func).claim_type::<T>()
	}

	/// Claims another type key; claiming the same key twice is a no-op.
	pub fn claim(mut self, key: TypeKey) -> Self {
		if !self.keys.contains(&key) {
			self.keys.push(key);
		}
		self
	}

	pub fn claim_type<T: Any>(self) -> Self {
		self.claim(TypeKey::of::<T>())
	}

	/// Claims the wildcard key, making this a fallback for unclaimed types.
	pub fn claim_wildcard(self) -> Self {
		self.claim(TypeKey::Wildcard)
	}

	/// Sets whether failures may be memoized per instance (default `true`).
	///
	/// Only dispatch that is handed a [`FailureCache`](crate::FailureCache) honors this.
	pub fn cache(mut self, on: bool) -> Self {
		self.validator.set_cache(on);
		self
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.validator.name()
	}

	#[inline]
	pub fn keys(&self) -> &[TypeKey] {
		&self.keys
	}
}

/// Declaration of a joint key/value validator for exact type pairs.
pub struct PairValidatorDecl<O> {
	pub(crate) validator: PairValidator<O>,
	pub(crate) pairs: SmallVec<[(ConcreteType, ConcreteType); 1]>,
}

impl<O: 'static> PairValidatorDecl<O> {
	/// Declares an erased joint validator that claims no pairs yet.
	pub fn erased(name: &'static str, func: PairValidatorFn<O>) -> Self {
		Self {
			validator: PairValidator::new(name, func),
			pairs: SmallVec::new(),
		}
	}

	/// Instance-bound joint validator for `(K, V)` entries.
	pub fn instance_bound<K, V, RK, RV>(
		name: &'static str,
		f: impl Fn(&O, &K, &V) -> ValidationResult<(RK, RV)> + Send + Sync + 'static,
	) -> Self
	where
		K: Any,
		V: Any,
		RK: Validatable,
		RV: Validatable,
	{
		let func = PairValidatorFn::instance(move |instance: &O, key: &Value, value: &Value| {
			let (key, value) = f(instance, downcast_input::<K>(key)?, downcast_input::<V>(value)?)?;
			Ok((Value::new(key), Value::new(value)))
		});
		Self::erased(name, func).claim_pair::<K, V>()
	}

	/// Class-bound joint validator for `(K, V)` entries.
	pub fn class_bound<K, V, RK, RV>(
		name: &'static str,
		f: impl Fn(&Owner, &K, &V) -> ValidationResult<(RK, RV)> + Send + Sync + 'static,
	) -> Self
	where
		K: Any,
		V: Any,
		RK: Validatable,
		RV: Validatable,
	{
		let func = PairValidatorFn::class(move |owner: &Owner, key: &Value, value: &Value| {
			let (key, value) = f(owner, downcast_input::<K>(key)?, downcast_input::<V>(value)?)?;
			Ok((Value::new(key), Value::new(value)))
		});
		Self::erased(name, func).claim_pair::<K, V>()
	}

	/// Static joint validator for `(K, V)` entries.
	pub fn static_bound<K, V, RK, RV>(
		name: &'static str,
		f: impl Fn(&K, &V) -> ValidationResult<(RK, RV)> + Send + Sync + 'static,
	) -> Self
	where
		K: Any,
		V: Any,
		RK: Validatable,
		RV: Validatable,
	{
		let func = PairValidatorFn::static_bound(move |key: &Value, value: &Value| {
			let (key, value) = f(downcast_input::<K>(key)?, downcast_input::<V>(value)?)?;
			Ok((Value::new(key), Value::new(value)))
		});
		Self::erased(name, func).claim_pair::<K, V>()
	}

	/// Claims an exact `(key type, value type)` pair.
	pub fn claim(mut self, key: ConcreteType, value: ConcreteType) -> Self {
		if !self.pairs.contains(&(key, value)) {
			self.pairs.push((key, value));
		}
		self
	}

	pub fn claim_pair<K: Any, V: Any>(self) -> Self {
		self.claim(ConcreteType::of::<K>(), ConcreteType::of::<V>())
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.validator.name()
	}

	#[inline]
	pub fn pairs(&self) -> &[(ConcreteType, ConcreteType)] {
		&self.pairs
	}
}
