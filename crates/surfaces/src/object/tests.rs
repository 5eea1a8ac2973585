use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use vetted_engine::{FailureCause, RegistryBuilder, ValidatorDecl};

use super::*;

#[derive(Debug)]
struct Port {
	reserved_below: u16,
}

impl Validated for Port {
	fn registry() -> &'static ValidatorRegistry<Self> {
		static REGISTRY: LazyLock<ValidatorRegistry<Port>> = LazyLock::new(|| {
			RegistryBuilder::new("port")
				.with(ValidatorDecl::instance_bound("unreserved", |port: &Port, n: &u16| {
					if *n >= port.reserved_below {
						Ok(*n)
					} else {
						Err(FailedValidation::new(format!("ports below {} are reserved", port.reserved_below)))
					}
				}))
				.with(ValidatorDecl::static_bound("parse", |s: &String| {
					s.trim()
						.parse::<u16>()
						.map_err(|err| FailedValidation::new(err.to_string()))
				}))
				.build()
		});
		&REGISTRY
	}
}

fn port() -> Port {
	Port { reserved_below: 1024 }
}

#[test]
fn test_accepts_and_transforms() {
	let accepted = port().validate(&Value::new(String::from(" 8080 "))).expect("parses");
	assert_eq!(accepted.downcast_ref::<u16>(), Some(&8080));

	let n: u16 = port().validate_as(&Value::new(8080u16)).expect("unreserved");
	assert_eq!(n, 8080);
}

#[test]
fn test_rejection_names_validator() {
	let err = port().validate(&Value::new(80u16)).expect_err("reserved");
	assert_eq!(err.to_string(), "\n\tunreserved(80):\n\t\tports below 1024 are reserved");
}

#[test]
fn test_unclaimed_type() {
	let err = port().validate(&Value::new(8080i32)).expect_err("no i32 validators");
	assert!(matches!(err.cause(), FailureCause::NoValidatorsForType(_)));
}

#[test]
fn test_validate_as_type_mismatch() {
	let err = port()
		.validate_as::<String>(&Value::new(8080u16))
		.expect_err("accepted a u16");
	assert_eq!(err.to_string(), "expected a value of type `alloc::string::String`, got `u16`");
}

#[derive(Debug, Default)]
struct Strict {
	attempts: AtomicUsize,
}

impl Validated for Strict {
	fn registry() -> &'static ValidatorRegistry<Self> {
		static REGISTRY: LazyLock<ValidatorRegistry<Strict>> = LazyLock::new(|| {
			RegistryBuilder::new("strict")
				.with(
					ValidatorDecl::instance_bound("never", |strict: &Strict, _: &u8| -> ValidationResult<u8> {
						strict.attempts.fetch_add(1, Ordering::Relaxed);
						Err(FailedValidation::new("rejected"))
					})
					.cache(true),
				)
				.build()
		});
		&REGISTRY
	}
}

#[test]
fn test_cache_flag_does_not_memoize_object_failures() {
	let strict = Strict::default();

	strict.validate(&Value::new(1u8)).expect_err("always rejects");
	strict.validate(&Value::new(1u8)).expect_err("always rejects");

	assert_eq!(strict.attempts.load(Ordering::Relaxed), 2);
}
