//! Type-erased input values.
//!
//! Validators are dispatched on the exact runtime type of their input, so the
//! engine moves inputs around as [`Value`]: an owned box that remembers its
//! concrete type, compares by value (failure cache lookups) and renders
//! through the wrapped type's `Debug` impl (diagnostics).

use std::any::Any;
use std::fmt;

use crate::type_key::{ConcreteType, TypeKey};

/// Bound for anything that can flow through the engine as a [`Value`].
///
/// Blanket-implemented; [`Value`] itself is deliberately not `PartialEq`, so
/// values never nest.
pub trait Validatable: Any + Clone + PartialEq + fmt::Debug + Send + Sync {}

impl<T> Validatable for T where T: Any + Clone + PartialEq + fmt::Debug + Send + Sync {}

trait DynValue: Any + Send + Sync {
	fn as_any(&self) -> &dyn Any;
	fn into_any(self: Box<Self>) -> Box<dyn Any>;
	fn concrete_type(&self) -> ConcreteType;
	fn dyn_eq(&self, other: &dyn DynValue) -> bool;
	fn dyn_clone(&self) -> Box<dyn DynValue>;
	fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Validatable> DynValue for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}

	fn concrete_type(&self) -> ConcreteType {
		ConcreteType::of::<T>()
	}

	fn dyn_eq(&self, other: &dyn DynValue) -> bool {
		other
			.as_any()
			.downcast_ref::<T>()
			.is_some_and(|other| self == other)
	}

	fn dyn_clone(&self) -> Box<dyn DynValue> {
		Box::new(self.clone())
	}

	fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

/// An owned runtime value of some concrete [`Validatable`] type.
pub struct Value(Box<dyn DynValue>);

impl Value {
	/// Wraps a concrete value.
	pub fn new<T: Validatable>(value: T) -> Self {
		Self(Box::new(value))
	}

	/// Returns the exact runtime type of the wrapped value.
	#[inline]
	pub fn concrete_type(&self) -> ConcreteType {
		self.0.concrete_type()
	}

	/// Returns the dispatch key for this value (always concrete).
	#[inline]
	pub fn type_key(&self) -> TypeKey {
		TypeKey::Concrete(self.concrete_type())
	}

	/// Returns the fully qualified type name of the wrapped value.
	#[inline]
	pub fn type_name(&self) -> &'static str {
		self.concrete_type().name()
	}

	/// Returns true if the wrapped value is a `T`.
	#[inline]
	pub fn is<T: Any>(&self) -> bool {
		self.0.as_any().is::<T>()
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.as_any().downcast_ref::<T>()
	}

	/// Unwraps the value as a `T`, handing it back unchanged on a type mismatch.
	pub fn downcast<T: Any>(self) -> Result<T, Self> {
		if !self.is::<T>() {
			return Err(self);
		}
		match self.0.into_any().downcast::<T>() {
			Ok(value) => Ok(*value),
			Err(_) => unreachable!("type checked before downcast"),
		}
	}

	/// Value equality; values of different runtime types are never equal.
	pub fn value_eq(&self, other: &Value) -> bool {
		self.0.dyn_eq(&*other.0)
	}
}

impl Clone for Value {
	fn clone(&self) -> Self {
		Self(self.0.dyn_clone())
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.dyn_fmt(f)
	}
}
