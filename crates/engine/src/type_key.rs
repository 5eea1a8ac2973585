//! Dispatch keys derived from runtime types.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::Value;

/// The exact runtime type of a value.
///
/// Equality and hashing use the [`TypeId`] only; the name is diagnostic.
#[derive(Clone, Copy, Debug)]
pub struct ConcreteType {
	id: TypeId,
	name: &'static str,
}

impl ConcreteType {
	pub fn of<T: Any + ?Sized>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	#[inline]
	pub fn id(self) -> TypeId {
		self.id
	}

	/// Fully qualified type name, as reported by [`std::any::type_name`].
	#[inline]
	pub fn name(self) -> &'static str {
		self.name
	}

	/// Type name without its module path (generic arguments are kept).
	pub fn short_name(self) -> &'static str {
		let path_end = self.name.find('<').unwrap_or(self.name.len());
		let start = self.name[..path_end].rfind("::").map_or(0, |idx| idx + 2);
		&self.name[start..]
	}
}

impl PartialEq for ConcreteType {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for ConcreteType {}

impl Hash for ConcreteType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Display for ConcreteType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Identifies a validator group.
///
/// A `Concrete` key matches inputs of exactly that type. `Wildcard` is only
/// consulted when no concrete group exists for the input's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
	Concrete(ConcreteType),
	Wildcard,
}

impl TypeKey {
	pub fn of<T: Any + ?Sized>() -> Self {
		Self::Concrete(ConcreteType::of::<T>())
	}

	pub fn of_value(value: &Value) -> Self {
		value.type_key()
	}

	#[inline]
	pub fn is_wildcard(self) -> bool {
		matches!(self, Self::Wildcard)
	}

	#[inline]
	pub fn concrete(self) -> Option<ConcreteType> {
		match self {
			Self::Concrete(ty) => Some(ty),
			Self::Wildcard => None,
		}
	}
}

impl From<ConcreteType> for TypeKey {
	fn from(ty: ConcreteType) -> Self {
		Self::Concrete(ty)
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Concrete(ty) => ty.fmt(f),
			Self::Wildcard => f.write_str("*"),
		}
	}
}

/// The type that owns a registry: a validated object, an attribute's host or
/// a mapping schema. Class-bound validators receive it instead of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Owner(ConcreteType);

impl Owner {
	pub fn of<O: Any>() -> Self {
		Self(ConcreteType::of::<O>())
	}

	#[inline]
	pub fn ty(self) -> ConcreteType {
		self.0
	}

	#[inline]
	pub fn name(self) -> &'static str {
		self.0.name()
	}

	#[inline]
	pub fn short_name(self) -> &'static str {
		self.0.short_name()
	}
}

impl fmt::Display for Owner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.short_name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Account;

	mod nested {
		pub struct Wrapper<T>(pub T);
	}

	#[test]
	fn test_equality_ignores_name() {
		assert_eq!(TypeKey::of::<i64>(), TypeKey::of::<i64>());
		assert_ne!(TypeKey::of::<i64>(), TypeKey::of::<i32>());
		assert_ne!(TypeKey::of::<i64>(), TypeKey::Wildcard);
	}

	#[test]
	fn test_short_names() {
		assert_eq!(Owner::of::<Account>().short_name(), "Account");
		assert_eq!(
			ConcreteType::of::<nested::Wrapper<Account>>().short_name(),
			format!("Wrapper<{}>", type_name::<Account>())
		);
		assert_eq!(ConcreteType::of::<u8>().short_name(), "u8");
	}

	#[test]
	fn test_display() {
		assert_eq!(TypeKey::Wildcard.to_string(), "*");
		assert_eq!(TypeKey::of::<u8>().to_string(), "u8");
	}
}
