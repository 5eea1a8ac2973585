//! Validated attributes.
//!
//! An [`AttrDescriptor`] is declared once per (owner type, attribute) and
//! shared by every instance. Each instance stores the attribute in an
//! [`AttrSlot`], which also holds that instance's [`FailureCache`].
//!
//! Assignment runs, in order: the coercer registered for the input's exact
//! type (if any), one dispatch against the descriptor's registry, a downcast
//! of the accepted value to the attribute type, and the store through the
//! setter override or the slot. A failure at any step leaves the stored value
//! untouched.

use std::any::{Any, type_name};
use std::fmt;

use rustc_hash::FxHashMap as HashMap;
use vetted_engine::{
	ConcreteType, FailedValidation, FailureCache, Owner, Validatable, ValidatorRegistry, Value,
	resolve_and_validate,
};

use crate::config::ValidationConfig;

type Coercer<O> = Box<dyn Fn(&O, Value) -> Value + Send + Sync>;

/// Per-instance storage for one validated attribute.
#[derive(Debug, Clone)]
pub struct AttrSlot<T> {
	value: Option<T>,
	cache: FailureCache,
}

impl<T> Default for AttrSlot<T> {
	fn default() -> Self {
		Self {
			value: None,
			cache: FailureCache::new(),
		}
	}
}

impl<T> AttrSlot<T> {
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn get(&self) -> Option<&T> {
		self.value.as_ref()
	}

	/// Stores `value` without validation.
	pub fn replace(&mut self, value: T) -> Option<T> {
		self.value.replace(value)
	}

	pub fn take(&mut self) -> Option<T> {
		self.value.take()
	}

	/// Failures memoized for this instance.
	#[inline]
	pub fn cache(&self) -> &FailureCache {
		&self.cache
	}
}

/// Class-level descriptor for an attribute of type `T` on owner `O`.
pub struct AttrDescriptor<O: 'static, T> {
	name: &'static str,
	private_name: String,
	registry: &'static ValidatorRegistry<O>,
	slot: fn(&O) -> &AttrSlot<T>,
	slot_mut: fn(&mut O) -> &mut AttrSlot<T>,
	coercers: HashMap<ConcreteType, Coercer<O>>,
	getter: Option<fn(&O) -> Option<&T>>,
	setter: Option<fn(&mut O, T)>,
	cache_failures: bool,
}

impl<O: 'static, T: Any> AttrDescriptor<O, T> {
	/// Creates a descriptor that stores values in the slot reached through
	/// `slot` / `slot_mut`.
	pub fn new(
		name: &'static str,
		registry: &'static ValidatorRegistry<O>,
		slot: fn(&O) -> &AttrSlot<T>,
		slot_mut: fn(&mut O) -> &mut AttrSlot<T>,
	) -> Self {
		let private_name = if name.starts_with('_') {
			format!("{name}_")
		} else {
			format!("_{name}")
		};
		Self {
			name,
			private_name,
			registry,
			slot,
			slot_mut,
			coercers: HashMap::default(),
			getter: None,
			setter: None,
			cache_failures: true,
		}
	}

	/// Registers a pre-validation coercion for inputs of exact type `U`.
	///
	/// Inputs of other types reach validation unchanged.
	pub fn coerce_with<U: Any>(mut self, coerce: impl Fn(&O, U) -> Value + Send + Sync + 'static) -> Self {
		let coercer: Coercer<O> = Box::new(move |instance: &O, input: Value| match input.downcast::<U>() {
			Ok(input) => coerce(instance, input),
			Err(input) => input,
		});
		self.coercers.insert(ConcreteType::of::<U>(), coercer);
		self
	}

	/// Reads through `getter` instead of the slot.
	pub fn getter(mut self, getter: fn(&O) -> Option<&T>) -> Self {
		self.getter = Some(getter);
		self
	}

	/// Stores accepted values through `setter` instead of the slot.
	pub fn setter(mut self, setter: fn(&mut O, T)) -> Self {
		self.setter = Some(setter);
		self
	}

	pub fn cache_failures(mut self, on: bool) -> Self {
		self.cache_failures = on;
		self
	}

	/// Applies the attribute-related settings of `config`.
	pub fn configure(self, config: &ValidationConfig) -> Self {
		self.cache_failures(config.cache_failures)
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Name of the backing storage: `_name`, or `name_` for names that
	/// already start with an underscore.
	#[inline]
	pub fn private_name(&self) -> &str {
		&self.private_name
	}

	#[inline]
	pub fn registry(&self) -> &'static ValidatorRegistry<O> {
		self.registry
	}

	pub fn get<'a>(&self, instance: &'a O) -> Option<&'a T> {
		match self.getter {
			Some(getter) => getter(instance),
			None => (self.slot)(instance).get(),
		}
	}

	/// Validates `input` and stores the accepted value.
	pub fn set<U: Validatable>(&self, instance: &mut O, input: U) -> Result<(), FailedValidation> {
		self.set_value(instance, Value::new(input))
	}

	/// Validates an already type-erased input and stores the accepted value.
	pub fn set_value(&self, instance: &mut O, input: Value) -> Result<(), FailedValidation> {
		let accepted = self.validate(instance, input)?;
		match self.setter {
			Some(setter) => setter(instance, accepted),
			None => {
				(self.slot_mut)(instance).replace(accepted);
			}
		}
		Ok(())
	}

	/// Coerces and validates `input` without storing it.
	///
	/// Failures are still memoized in the instance's cache.
	pub fn validate(&self, instance: &mut O, input: Value) -> Result<T, FailedValidation> {
		let input = match self.coercers.get(&input.concrete_type()) {
			Some(coerce) => coerce(&*instance, input),
			None => input,
		};

		let result = if self.cache_failures {
			// Validators borrow the instance, so the cache is moved out of the
			// slot for the duration of the call.
			let mut cache = std::mem::take(&mut (self.slot_mut)(instance).cache);
			let result = resolve_and_validate(self.registry, &*instance, &input, Some(&mut cache));
			(self.slot_mut)(instance).cache = cache;
			result
		} else {
			resolve_and_validate(self.registry, &*instance, &input, None)
		};

		let accepted = result.inspect_err(|failure| {
			tracing::debug!(
				attr = self.name,
				owner = %Owner::of::<O>(),
				failures = failure.records().len(),
				"attribute assignment rejected"
			);
		})?;

		accepted
			.downcast::<T>()
			.map_err(|accepted| FailedValidation::type_mismatch(type_name::<T>(), accepted.type_name()))
	}
}

impl<O: 'static, T> fmt::Debug for AttrDescriptor<O, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttrDescriptor")
			.field("name", &self.name)
			.field("private_name", &self.private_name)
			.field("registry", &self.registry.label())
			.field("coercers", &self.coercers.len())
			.field("getter", &self.getter.is_some())
			.field("setter", &self.setter.is_some())
			.field("cache_failures", &self.cache_failures)
			.finish()
	}
}
