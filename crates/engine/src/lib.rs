//! Type-dispatched validation engine.
//!
//! # Purpose
//!
//! Given a runtime [`Value`] and a frozen [`ValidatorRegistry`] of named
//! validators grouped by the input type they claim, the engine resolves the
//! applicable group, tries candidates until one accepts the input, and
//! otherwise reports every failed attempt in one aggregated
//! [`FailedValidation`].
//!
//! # Mental Model
//!
//! 1. **Declaration:** Host surfaces describe validators as [`ValidatorDecl`]s
//!    (name, binding, claimed [`TypeKey`]s, cache flag, callable).
//! 2. **Build:** A [`RegistryBuilder`] groups declarations by type key once,
//!    at owner-definition time, and freezes them into a [`ValidatorRegistry`].
//!    Mappings use a [`MappingRegistry`] holding key-only, value-only and
//!    joint key/value groups.
//! 3. **Dispatch:** [`resolve_and_validate`] and [`resolve_and_validate_pair`]
//!    look up the group for the input's exact type (falling back to the
//!    wildcard group), invoke candidates, and return the first success.
//! 4. **Diagnostics:** Failed attempts become [`FailureRecord`]s collected in a
//!    [`FailureAggregate`], rendered as one indented multi-line message.
//!
//! # Invariants
//!
//! - Dispatch never mutates a registry; only a caller-supplied
//!   [`FailureCache`] is written during validation.
//! - Only failed attempts are written to the failure cache, never successes.
//! - Every failure is either superseded by a later success in the same call or
//!   surfaces in the final aggregate.
//! - Candidate order within a group is unspecified.

pub mod cache;
pub mod dispatch;
pub mod failure;
pub mod registry;
pub mod type_key;
pub mod validator;
pub mod value;

pub use cache::FailureCache;
pub use dispatch::{PairPolicy, resolve_and_validate, resolve_and_validate_pair};
pub use failure::{FailedValidation, FailureAggregate, FailureCause, FailureRecord, Side};
pub use registry::{
	DuplicateRegistration, MappingRegistry, MappingRegistryBuilder, RegistryBuilder,
	ValidatorRegistry,
};
pub use type_key::{ConcreteType, Owner, TypeKey};
pub use validator::{
	PairValidator, PairValidatorDecl, PairValidatorFn, ValidationResult, Validator,
	ValidatorBinding, ValidatorDecl, ValidatorFn,
};
pub use value::{Validatable, Value};

#[cfg(test)]
pub(crate) mod test_fixtures;
