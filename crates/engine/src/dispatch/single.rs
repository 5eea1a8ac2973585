use crate::cache::FailureCache;
use crate::failure::{FailedValidation, FailureAggregate, FailureRecord};
use crate::registry::ValidatorRegistry;
use crate::type_key::Owner;
use crate::validator::{ValidationResult, Validator};
use crate::value::Value;

/// Validates `input` against the group registered for its exact type.
///
/// Falls back to the wildcard group when no exact group exists, and fails
/// with a no-validators failure when neither exists. Candidates are tried
/// until one accepts; its result is returned and later candidates are not
/// invoked. If every candidate fails, the error aggregates one record per
/// attempt.
///
/// With a `cache`, a cache-enabled validator that already failed on an equal
/// input is not invoked again; its recorded failure is reused.
pub fn resolve_and_validate<O>(
	registry: &ValidatorRegistry<O>,
	instance: &O,
	input: &Value,
	mut cache: Option<&mut FailureCache>,
) -> ValidationResult {
	let ty = input.concrete_type();
	let Some((key, group)) = registry.resolve(ty).filter(|(_, group)| !group.is_empty()) else {
		tracing::debug!(registry = registry.label(), ty = %ty, "no validators for type");
		return Err(FailedValidation::no_validators(ty, None));
	};

	if key.is_wildcard() {
		tracing::debug!(
			registry = registry.label(),
			ty = %ty,
			"no exact validator group, using wildcard"
		);
	}

	let mut aggregate = FailureAggregate::new();
	for validator in group {
		match attempt(validator, registry.owner(), instance, input, cache.as_deref_mut()) {
			Ok(accepted) => return Ok(accepted),
			Err(failure) => {
				aggregate.push(FailureRecord::new(validator.name(), format!("{input:?}"), failure));
			}
		}
	}

	tracing::debug!(
		registry = registry.label(),
		ty = %ty,
		failures = aggregate.len(),
		"all validators rejected input"
	);
	Err(aggregate.into_failure())
}

/// Runs one candidate, consulting and feeding the failure cache.
pub(super) fn attempt<O>(
	validator: &Validator<O>,
	owner: Owner,
	instance: &O,
	input: &Value,
	cache: Option<&mut FailureCache>,
) -> ValidationResult {
	let cache = cache.filter(|_| validator.cache());

	if let Some(cached) = cache
		.as_deref()
		.and_then(|cache| cache.get(validator.name(), input))
	{
		tracing::debug!(validator = validator.name(), "reusing cached failure");
		return Err(cached.clone());
	}

	tracing::trace!(
		validator = validator.name(),
		binding = ?validator.binding(),
		"invoking validator"
	);
	let result = validator.invoke(instance, &owner, input);

	if let (Err(failure), Some(cache)) = (&result, cache) {
		cache.insert(validator.name(), input.clone(), failure.clone());
	}
	result
}
