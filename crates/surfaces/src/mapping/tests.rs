use std::sync::LazyLock;

use pretty_assertions::assert_eq;
use vetted_engine::{PairValidatorDecl, ValidatorDecl};

use super::*;

#[derive(Debug)]
struct Limits {
	ceiling: u32,
	capacity: usize,
	policy: MappingPolicy,
}

impl Limits {
	fn new(ceiling: u32) -> Self {
		Self {
			ceiling,
			capacity: 8,
			policy: MappingPolicy::BOTH,
		}
	}
}

/// Lowercases `key`, refusing new keys once the mapping is at capacity.
fn admit(mapping: &ValidatedMapping<Limits>, key: &str) -> ValidationResult<String> {
	let key = key.to_lowercase();
	if !mapping.contains_key(&key) && mapping.len() >= mapping.schema().capacity {
		return Err(FailedValidation::new(format!(
			"holds at most {} entries",
			mapping.schema().capacity
		)));
	}
	Ok(key)
}

impl MappingSchema for Limits {
	type Key = String;
	type Value = u32;

	fn registry() -> &'static MappingRegistry<ValidatedMapping<Self>> {
		static REGISTRY: LazyLock<MappingRegistry<ValidatedMapping<Limits>>> = LazyLock::new(|| {
			ValidatedMapping::registry_builder("limits")
				.key(ValidatorDecl::instance_bound("lowercase", |m: &ValidatedMapping<Limits>, k: &String| {
					admit(m, k)
				}))
				.key(ValidatorDecl::instance_bound("owned", |m: &ValidatedMapping<Limits>, k: &&'static str| {
					admit(m, k)
				}))
				.value(ValidatorDecl::instance_bound("under_ceiling", |m: &ValidatedMapping<Limits>, v: &u32| {
					let ceiling = m.schema().ceiling;
					if *v <= ceiling {
						Ok(*v)
					} else {
						Err(FailedValidation::new(format!("must be at most {ceiling}")))
					}
				}))
				.joint(PairValidatorDecl::static_bound("numbered", |k: &i64, v: &i64| {
					let v = u32::try_from(*v).map_err(|err| FailedValidation::new(err.to_string()))?;
					Ok((format!("slot{k}"), v))
				}))
				.build()
		});
		&REGISTRY
	}

	fn policy(&self) -> MappingPolicy {
		self.policy
	}
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();
}

fn entries(mapping: &ValidatedMapping<Limits>) -> Vec<(&str, u32)> {
	mapping.iter().map(|(k, v)| (k.as_str(), *v)).collect()
}

#[test]
fn test_insert_stores_accepted_entry() {
	init_tracing();
	let mut mapping = ValidatedMapping::new(Limits::new(10));

	assert_eq!(mapping.insert("CPU", 4u32).expect("valid"), None);
	assert_eq!(mapping.get(&"cpu".to_string()), Some(&4));
	assert!(!mapping.contains_key(&"CPU".to_string()));
}

#[test]
fn test_update_keeps_position() {
	let mut mapping = ValidatedMapping::new(Limits::new(10));
	mapping.insert("a", 1u32).expect("valid");
	mapping.insert("b", 2u32).expect("valid");

	let previous = mapping.insert(String::from("A"), 3u32).expect("valid");
	assert_eq!(previous, Some(1));
	assert_eq!(entries(&mapping), [("a", 3), ("b", 2)]);
}

#[test]
fn test_rejected_insert_leaves_mapping_unchanged() {
	init_tracing();
	let mut mapping = ValidatedMapping::new(Limits::new(10));
	mapping.insert("a", 1u32).expect("valid");

	let err = mapping.insert("a", 11u32).expect_err("over ceiling");
	assert_eq!(
		err.to_string(),
		"\n\tvalue:\n\t\tunder_ceiling(value=11):\n\t\t\tmust be at most 10"
	);
	let err = mapping.insert(7u8, 1u32).expect_err("no u8 key validators");
	assert_eq!(err.records()[0].validator, "Limits.validate");

	assert_eq!(entries(&mapping), [("a", 1)]);
}

#[test]
fn test_validate_is_a_dry_run() {
	let mapping = ValidatedMapping::new(Limits::new(10));

	let (key, value) = mapping
		.validate(Value::new("Disk"), Value::new(8u32))
		.expect("valid");
	assert_eq!((key.as_str(), value), ("disk", 8));
	assert!(mapping.is_empty());
}

#[test]
fn test_joint_validator_remaps_entry() {
	let mut mapping = ValidatedMapping::new(Limits::new(10));

	mapping.insert(3i64, 500i64).expect("joint accepts");
	assert_eq!(entries(&mapping), [("slot3", 500)]);

	let err = mapping.insert(4i64, -1i64).expect_err("negative value");
	assert_eq!(err.records().len(), 1);
	assert_eq!(err.records()[0].input_repr, "key=4, value=-1");
	assert_eq!(mapping.len(), 1);
}

#[test]
fn test_disabled_side_must_already_have_stored_type() {
	let limits = Limits {
		policy: MappingPolicy::new(true, false),
		..Limits::new(10)
	};
	let mut mapping = ValidatedMapping::new(limits);

	mapping.insert("a", 99u32).expect("values not validated");
	assert_eq!(mapping.get(&"a".to_string()), Some(&99));

	let err = mapping.insert("b", "five").expect_err("not a u32");
	assert_eq!(
		err.to_string(),
		"\n\tvalue:\n\t\tLimits.validate(value=\"five\"):\n\t\t\texpected a value of type `u32`, got `&str`"
	);
	assert!(!mapping.contains_key(&"b".to_string()));
}

#[test]
fn test_remove_preserves_order() {
	let mut mapping = ValidatedMapping::with_entries(
		Limits::new(10),
		["a", "b", "c"]
			.into_iter()
			.zip(1u32..)
			.map(|(k, v)| (Value::new(k), Value::new(v))),
	)
	.expect("valid entries");

	assert_eq!(mapping.remove(&"b".to_string()), Some(2));
	assert_eq!(mapping.remove(&"b".to_string()), None);
	assert_eq!(mapping.keys().map(String::as_str).collect::<Vec<_>>(), ["a", "c"]);
	assert_eq!(mapping.values().copied().collect::<Vec<_>>(), [1, 3]);
}

#[test]
fn test_with_entries_stops_at_first_failure() {
	let err = ValidatedMapping::with_entries(
		Limits::new(10),
		[
			(Value::new("a"), Value::new(1u32)),
			(Value::new("b"), Value::new(50u32)),
			(Value::new("c"), Value::new(60u32)),
		],
	)
	.expect_err("second entry is over the ceiling");

	assert_eq!(err.records().len(), 1);
	assert_eq!(err.records()[0].input_repr, "value=50");
}

#[test]
fn test_instance_bound_validators_see_current_entries() {
	let limits = Limits {
		capacity: 2,
		..Limits::new(10)
	};
	let mut mapping = ValidatedMapping::new(limits);
	mapping.insert("a", 1u32).expect("room left");
	mapping.insert("b", 2u32).expect("room left");

	let err = mapping.insert("c", 3u32).expect_err("mapping is full");
	assert_eq!(
		err.to_string(),
		"\n\tkey:\n\t\towned(key=\"c\"):\n\t\t\tholds at most 2 entries"
	);

	// Updating an existing key does not need room.
	mapping.insert("A", 5u32).expect("existing key");
	assert_eq!(entries(&mapping), [("a", 5), ("b", 2)]);

	mapping.remove(&"b".to_string());
	mapping.insert("c", 3u32).expect("room after removal");
	assert_eq!(mapping.len(), 2);
}

#[test]
fn test_stored_type_mismatch_reported_for_both_sides() {
	let limits = Limits {
		policy: MappingPolicy::new(false, false),
		..Limits::new(10)
	};
	let mapping = ValidatedMapping::new(limits);

	let err = mapping
		.validate(Value::new(1i64), Value::new("x"))
		.expect_err("neither side has the stored type");

	let sides: Vec<_> = err.records().iter().map(|r| r.side).collect();
	assert_eq!(sides, [Some(Side::Key), Some(Side::Value)]);
	assert_eq!(
		err.to_string(),
		"\n\tkey:\n\t\tLimits.validate(key=1):\n\t\t\texpected a value of type `alloc::string::String`, got `i64`\
		 \n\tvalue:\n\t\tLimits.validate(value=\"x\"):\n\t\t\texpected a value of type `u32`, got `&str`"
	);
}
