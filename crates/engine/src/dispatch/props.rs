use proptest::prelude::*;

use super::resolve_and_validate;
use crate::cache::FailureCache;
use crate::failure::FailedValidation;
use crate::registry::{RegistryBuilder, ValidatorRegistry};
use crate::test_fixtures::{Calls, Form};
use crate::validator::ValidatorDecl;
use crate::value::Value;

const NAMES: [&str; 6] = ["v0", "v1", "v2", "v3", "v4", "v5"];

/// One `i64` validator per threshold; each accepts inputs at or above it.
fn thresholds(limits: &[i64], calls: &Calls) -> ValidatorRegistry<Form> {
	let mut builder = RegistryBuilder::new("props");
	for (name, &limit) in NAMES.into_iter().zip(limits) {
		let calls = calls.clone();
		builder.push(ValidatorDecl::static_bound(name, move |x: &i64| {
			calls.hit();
			if *x >= limit {
				Ok(*x)
			} else {
				Err(FailedValidation::new(format!("below {limit}")))
			}
		}));
	}
	builder.build()
}

proptest! {
	/// Accepts iff some candidate accepts; a rejection carries one record per candidate.
	#[test]
	fn prop_outcome_matches_candidates(
		limits in prop::collection::vec(-50i64..50, 1..=NAMES.len()),
		input in -60i64..60,
	) {
		let calls = Calls::default();
		let registry = thresholds(&limits, &calls);
		let result = resolve_and_validate(&registry, &Form::default(), &Value::new(input), None);

		match result {
			Ok(accepted) => {
				prop_assert!(limits.iter().any(|&limit| input >= limit));
				prop_assert_eq!(accepted.downcast_ref::<i64>(), Some(&input));
				prop_assert!(calls.get() <= limits.len());
			}
			Err(failure) => {
				prop_assert!(limits.iter().all(|&limit| input < limit));
				prop_assert_eq!(failure.records().len(), limits.len());
				prop_assert_eq!(calls.get(), limits.len());
			}
		}
	}

	/// A second rejection of an equal input is served entirely from the cache.
	#[test]
	fn prop_cached_rejection_does_not_reinvoke(
		limits in prop::collection::vec(0i64..50, 1..=NAMES.len()),
		input in -20i64..0,
	) {
		let calls = Calls::default();
		let registry = thresholds(&limits, &calls);
		let mut cache = FailureCache::new();

		let first = resolve_and_validate(&registry, &Form::default(), &Value::new(input), Some(&mut cache));
		let invoked = calls.get();
		let second = resolve_and_validate(&registry, &Form::default(), &Value::new(input), Some(&mut cache));

		prop_assert_eq!(calls.get(), invoked);
		prop_assert_eq!(cache.len(), limits.len());
		prop_assert_eq!(
			first.err().map(|f| f.to_string()),
			second.err().map(|f| f.to_string())
		);
	}
}
