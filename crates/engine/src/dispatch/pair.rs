use std::sync::Arc;

use super::PairPolicy;
use super::single::attempt;
use crate::failure::{FailedValidation, FailureAggregate, FailureRecord, Side};
use crate::registry::{MappingRegistry, ValidatorRegistry};
use crate::validator::{PairValidator, ValidationResult};
use crate::value::Value;

/// Validates a mapping entry before insertion.
///
/// A joint group for the exact `(key type, value type)` pair takes absolute
/// precedence and may remap both sides. Otherwise the key and the value are
/// resolved independently against the key-only and value-only registries; a
/// side disabled by `policy` forwards its raw input unchanged.
///
/// Both sides are always attempted, so a rejection reports every failure of
/// whichever side(s) failed. Nothing is returned unless both sides succeed.
pub fn resolve_and_validate_pair<O>(
	registry: &MappingRegistry<O>,
	instance: &O,
	key: Value,
	value: Value,
	policy: PairPolicy,
) -> ValidationResult<(Value, Value)> {
	let (key_ty, value_ty) = (key.concrete_type(), value.concrete_type());
	if let Some(group) = registry
		.joint(key_ty, value_ty)
		.filter(|group| !group.is_empty())
	{
		return validate_joint(registry, group, instance, &key, &value);
	}

	let mut aggregate = FailureAggregate::new();
	let key = if policy.validate_keys {
		resolve_side(registry.keys(), Side::Key, instance, &key, &mut aggregate)
	} else {
		Some(key)
	};
	let value = if policy.validate_values {
		resolve_side(registry.values(), Side::Value, instance, &value, &mut aggregate)
	} else {
		Some(value)
	};

	match (key, value) {
		(Some(key), Some(value)) => Ok((key, value)),
		_ => {
			tracing::debug!(
				registry = registry.label(),
				key = %key_ty,
				value = %value_ty,
				failures = aggregate.len(),
				"mapping entry rejected"
			);
			Err(aggregate.into_failure())
		}
	}
}

fn validate_joint<O>(
	registry: &MappingRegistry<O>,
	group: &[Arc<PairValidator<O>>],
	instance: &O,
	key: &Value,
	value: &Value,
) -> ValidationResult<(Value, Value)> {
	let owner = registry.owner();
	let repr = format!("key={key:?}, value={value:?}");
	let mut aggregate = FailureAggregate::new();

	for validator in group {
		tracing::trace!(
			validator = validator.name(),
			binding = ?validator.binding(),
			"invoking joint validator"
		);
		match validator.invoke(instance, &owner, key, value) {
			Ok(entry) => return Ok(entry),
			Err(failure) => aggregate.push(FailureRecord::new(validator.name(), repr.clone(), failure)),
		}
	}

	tracing::debug!(
		registry = registry.label(),
		failures = aggregate.len(),
		"all joint validators rejected entry"
	);
	Err(aggregate.into_failure())
}

/// Resolves one side of an entry. Failures are only appended to `aggregate`
/// when the side fails as a whole.
fn resolve_side<O>(
	registry: &ValidatorRegistry<O>,
	side: Side,
	instance: &O,
	input: &Value,
	aggregate: &mut FailureAggregate,
) -> Option<Value> {
	let ty = input.concrete_type();
	let repr = format!("{side}={input:?}");

	let Some((_, group)) = registry.resolve(ty).filter(|(_, group)| !group.is_empty()) else {
		let validator = format!("{}.validate", registry.owner().short_name());
		let failure = FailedValidation::no_validators(ty, Some(side));
		aggregate.push(FailureRecord::new(validator, repr, failure).on_side(side));
		return None;
	};

	let mut failures = FailureAggregate::new();
	for validator in group {
		match attempt(validator, registry.owner(), instance, input, None) {
			Ok(accepted) => return Some(accepted),
			Err(failure) => {
				failures.push(FailureRecord::new(validator.name(), repr.clone(), failure).on_side(side));
			}
		}
	}
	aggregate.extend(failures);
	None
}
