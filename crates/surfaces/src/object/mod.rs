//! Validated objects: a type that checks arbitrary inputs against its own
//! validator registry.
//!
//! The object flavor keeps no failure cache; every call dispatches afresh.

use std::any::{Any, type_name};

use vetted_engine::{FailedValidation, ValidationResult, ValidatorRegistry, Value, resolve_and_validate};

pub trait Validated: Sized + 'static {
	/// The frozen registry shared by every instance of `Self`.
	fn registry() -> &'static ValidatorRegistry<Self>;

	/// Validates `input` and returns the accepted value, which may differ from
	/// the input in both value and type.
	///
	/// No failure cache is involved, so [`ValidatorDecl::cache`] has no effect
	/// here and a rejecting validator runs again on every call.
	///
	/// [`ValidatorDecl::cache`]: vetted_engine::ValidatorDecl::cache
	fn validate(&self, input: &Value) -> ValidationResult {
		resolve_and_validate(Self::registry(), self, input, None)
	}

	/// Like [`Validated::validate`], but also requires the accepted value to be
	/// an `R`.
	fn validate_as<R: Any>(&self, input: &Value) -> ValidationResult<R> {
		self.validate(input)?.downcast::<R>().map_err(|accepted| {
			FailedValidation::type_mismatch(type_name::<R>(), accepted.type_name())
		})
	}
}

#[cfg(test)]
mod tests;
