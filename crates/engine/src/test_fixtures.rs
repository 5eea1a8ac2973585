//! Shared fixtures for engine unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::failure::FailedValidation;
use crate::validator::{ValidationResult, ValidatorDecl};

/// Owner type used across engine tests.
#[derive(Debug, Default)]
pub(crate) struct Form {
	pub min_len: usize,
}

/// Counts how many times a validator body ran.
#[derive(Clone, Default)]
pub(crate) struct Calls(Arc<AtomicUsize>);

impl Calls {
	pub fn hit(&self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}

	pub fn get(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}
}

/// Static `i64` validator that always rejects with `message`.
pub(crate) fn rejecting(name: &'static str, message: &'static str, calls: &Calls) -> ValidatorDecl<Form> {
	let calls = calls.clone();
	ValidatorDecl::static_bound(name, move |_: &i64| -> ValidationResult<i64> {
		calls.hit();
		Err(FailedValidation::new(message))
	})
}

/// Static `i64` validator that accepts and maps the input to `output`.
pub(crate) fn accepting(name: &'static str, output: i64, calls: &Calls) -> ValidatorDecl<Form> {
	let calls = calls.clone();
	ValidatorDecl::static_bound(name, move |_: &i64| {
		calls.hit();
		Ok(output)
	})
}

pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();
}
