//! Validators and the way they receive context.
//!
//! A validator is a named callable that either accepts its input, returning a
//! (possibly transformed) [`Value`], or rejects it with a [`FailedValidation`].
//! How it is called is fixed at declaration time by its [`ValidatorBinding`],
//! which is the discriminant of the stored [`ValidatorFn`].

use std::fmt;
use std::sync::Arc;

use crate::failure::FailedValidation;
use crate::type_key::Owner;
use crate::value::Value;

mod decl;

pub use decl::{PairValidatorDecl, ValidatorDecl};

/// Result of a single validator invocation.
pub type ValidationResult<T = Value> = Result<T, FailedValidation>;

/// How a validator receives context when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorBinding {
	/// Receives the validating instance and the input.
	InstanceBound,
	/// Receives the owner type and the input.
	ClassBound,
	/// Receives only the input.
	StaticBound,
}

type InstanceFn<O> = dyn Fn(&O, &Value) -> ValidationResult + Send + Sync;
type ClassFn = dyn Fn(&Owner, &Value) -> ValidationResult + Send + Sync;
type StaticFn = dyn Fn(&Value) -> ValidationResult + Send + Sync;

/// A single-input validator callable, tagged by binding.
pub enum ValidatorFn<O> {
	Instance(Arc<InstanceFn<O>>),
	Class(Arc<ClassFn>),
	Static(Arc<StaticFn>),
}

impl<O> ValidatorFn<O> {
	pub fn instance(f: impl Fn(&O, &Value) -> ValidationResult + Send + Sync + 'static) -> Self {
		Self::Instance(Arc::new(f))
	}

	pub fn class(f: impl Fn(&Owner, &Value) -> ValidationResult + Send + Sync + 'static) -> Self {
		Self::Class(Arc::new(f))
	}

	pub fn static_bound(f: impl Fn(&Value) -> ValidationResult + Send + Sync + 'static) -> Self {
		Self::Static(Arc::new(f))
	}

	pub fn binding(&self) -> ValidatorBinding {
		match self {
			Self::Instance(_) => ValidatorBinding::InstanceBound,
			Self::Class(_) => ValidatorBinding::ClassBound,
			Self::Static(_) => ValidatorBinding::StaticBound,
		}
	}

	fn call(&self, instance: &O, owner: &Owner, input: &Value) -> ValidationResult {
		match self {
			Self::Instance(f) => f(instance, input),
			Self::Class(f) => f(owner, input),
			Self::Static(f) => f(input),
		}
	}
}

impl<O> Clone for ValidatorFn<O> {
	fn clone(&self) -> Self {
		match self {
			Self::Instance(f) => Self::Instance(Arc::clone(f)),
			Self::Class(f) => Self::Class(Arc::clone(f)),
			Self::Static(f) => Self::Static(Arc::clone(f)),
		}
	}
}

/// A named single-input validator.
pub struct Validator<O> {
	name: &'static str,
	cache: bool,
	func: ValidatorFn<O>,
}

impl<O> Validator<O> {
	pub fn new(name: &'static str, func: ValidatorFn<O>) -> Self {
		Self {
			name,
			cache: true,
			func,
		}
	}

	/// Stable name, used in diagnostics and failure cache keys.
	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Whether failures of this validator may be memoized per instance.
	#[inline]
	pub fn cache(&self) -> bool {
		self.cache
	}

	#[inline]
	pub fn binding(&self) -> ValidatorBinding {
		self.func.binding()
	}

	/// Invokes the validator with the arguments its binding calls for.
	pub fn invoke(&self, instance: &O, owner: &Owner, input: &Value) -> ValidationResult {
		self.func.call(instance, owner, input)
	}

	pub(crate) fn set_cache(&mut self, on: bool) {
		self.cache = on;
	}
}

impl<O> fmt::Debug for Validator<O> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Validator")
			.field("name", &self.name)
			.field("binding", &self.binding())
			.field("cache", &self.cache)
			.finish()
	}
}

type PairInstanceFn<O> = dyn Fn(&O, &Value, &Value) -> ValidationResult<(Value, Value)> + Send + Sync;
type PairClassFn = dyn Fn(&Owner, &Value, &Value) -> ValidationResult<(Value, Value)> + Send + Sync;
type PairStaticFn = dyn Fn(&Value, &Value) -> ValidationResult<(Value, Value)> + Send + Sync;

/// A joint key/value validator callable, tagged by binding.
///
/// Joint validators may remap both the key and the value.
pub enum PairValidatorFn<O> {
	Instance(Arc<PairInstanceFn<O>>),
	Class(Arc<PairClassFn>),
	Static(Arc<PairStaticFn>),
}

impl<O> PairValidatorFn<O> {
	pub fn instance(
		f: impl Fn(&O, &Value, &Value) -> ValidationResult<(Value, Value)> + Send + Sync + 'static,
	) -> Self {
		Self::Instance(Arc::new(f))
	}

	pub fn class(
		f: impl Fn(&Owner, &Value, &Value) -> ValidationResult<(Value, Value)> + Send + Sync + 'static,
	) -> Self {
		Self::Class(Arc::new(f))
	}

	pub fn static_bound(
		f: impl Fn(&Value, &Value) -> ValidationResult<(Value, Value)> + Send + Sync + 'static,
	) -> Self {
		Self::Static(Arc::new(f))
	}

	pub fn binding(&self) -> ValidatorBinding {
		match self {
			Self::Instance(_) => ValidatorBinding::InstanceBound,
			Self::Class(_) => ValidatorBinding::ClassBound,
			Self::Static(_) => ValidatorBinding::StaticBound,
		}
	}
}

/// A named joint key/value validator.
pub struct PairValidator<O> {
	name: &'static str,
	func: PairValidatorFn<O>,
}

impl<O> PairValidator<O> {
	pub fn new(name: &'static str, func: PairValidatorFn<O>) -> Self {
		Self { name, func }
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}

	#[inline]
	pub fn binding(&self) -> ValidatorBinding {
		self.func.binding()
	}

	pub fn invoke(
		&self,
		instance: &O,
		owner: &Owner,
		key: &Value,
		value: &Value,
	) -> ValidationResult<(Value, Value)> {
		match &self.func {
			PairValidatorFn::Instance(f) => f(instance, key, value),
			PairValidatorFn::Class(f) => f(owner, key, value),
			PairValidatorFn::Static(f) => f(key, value),
		}
	}
}

impl<O> fmt::Debug for PairValidator<O> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PairValidator")
			.field("name", &self.name)
			.field("binding", &self.binding())
			.finish()
	}
}
