//! Validation failures and their aggregation.
//!
//! There is a single error kind, [`FailedValidation`]. Its [`FailureCause`]
//! distinguishes a validator's own rejection, a missing validator group and
//! an exhausted candidate list; all three travel as the same type.

use std::borrow::Cow;
use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::type_key::ConcreteType;

mod format;

/// Fragment used when a failure is built from an empty fragment list.
const GENERIC_FRAGMENT: &str = "validation failed";

/// Why a validation call was rejected.
#[derive(Debug, Clone)]
pub enum FailureCause {
	/// A validator rejected its input.
	Raised,
	/// No group exists for the input's type and there is no wildcard group.
	NoValidatorsForType(ConcreteType),
	/// Every candidate ran and failed; carries one record per attempt.
	AllCandidatesFailed(FailureAggregate),
}

/// A rejected validation, carrying one or more human-readable fragments.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .fragments.join("\n"))]
pub struct FailedValidation {
	cause: FailureCause,
	fragments: SmallVec<[String; 1]>,
}

impl FailedValidation {
	/// A validator's own rejection with a single message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			cause: FailureCause::Raised,
			fragments: smallvec![message.into()],
		}
	}

	/// A validator's own rejection with several fragments.
	///
	/// An empty iterator yields a generic fragment so at least one is present.
	pub fn with_fragments<I, S>(fragments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut fragments: SmallVec<[String; 1]> = fragments.into_iter().map(Into::into).collect();
		if fragments.is_empty() {
			fragments.push(GENERIC_FRAGMENT.to_string());
		}
		Self {
			cause: FailureCause::Raised,
			fragments,
		}
	}

	/// No validators are registered for `ty`, optionally on one side of a
	/// mapping entry.
	pub fn no_validators(ty: ConcreteType, side: Option<Side>) -> Self {
		let message = match side {
			Some(side) => format!("No {side} validators specified for type `{ty}`"),
			None => format!("No validators specified for type `{ty}`"),
		};
		Self {
			cause: FailureCause::NoValidatorsForType(ty),
			fragments: smallvec![message],
		}
	}

	/// A value of type `actual` arrived where `expected` was required.
	pub fn type_mismatch(expected: &str, actual: &str) -> Self {
		Self::new(format!("expected a value of type `{expected}`, got `{actual}`"))
	}

	/// Wraps an aggregate; the rendered aggregate is the only fragment.
	pub fn from_aggregate(aggregate: FailureAggregate) -> Self {
		Self {
			fragments: smallvec![aggregate.render()],
			cause: FailureCause::AllCandidatesFailed(aggregate),
		}
	}

	/// Appends another fragment.
	pub fn push(&mut self, fragment: impl Into<String>) {
		self.fragments.push(fragment.into());
	}

	/// Builder form of [`Self::push`].
	pub fn with(mut self, fragment: impl Into<String>) -> Self {
		self.push(fragment);
		self
	}

	#[inline]
	pub fn cause(&self) -> &FailureCause {
		&self.cause
	}

	#[inline]
	pub fn fragments(&self) -> &[String] {
		&self.fragments
	}

	pub fn is_no_validators(&self) -> bool {
		matches!(self.cause, FailureCause::NoValidatorsForType(_))
	}

	pub fn aggregate(&self) -> Option<&FailureAggregate> {
		match &self.cause {
			FailureCause::AllCandidatesFailed(aggregate) => Some(aggregate),
			_ => None,
		}
	}

	/// Records of the aggregate this failure wraps; empty for other causes.
	pub fn records(&self) -> &[FailureRecord] {
		match self.aggregate() {
			Some(aggregate) => aggregate.records(),
			None => &[],
		}
	}
}

/// Which half of a mapping entry a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	Key,
	Value,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Key => f.write_str("key"),
			Self::Value => f.write_str("value"),
		}
	}
}

/// One failed attempt: which validator, on what input, and why.
#[derive(Debug, Clone)]
pub struct FailureRecord {
	pub validator: Cow<'static, str>,
	pub input_repr: String,
	pub side: Option<Side>,
	pub failure: FailedValidation,
}

impl FailureRecord {
	pub fn new(
		validator: impl Into<Cow<'static, str>>,
		input_repr: impl Into<String>,
		failure: FailedValidation,
	) -> Self {
		Self {
			validator: validator.into(),
			input_repr: input_repr.into(),
			side: None,
			failure,
		}
	}

	/// Tags the record with a mapping side.
	pub fn on_side(mut self, side: Side) -> Self {
		self.side = Some(side);
		self
	}
}

/// Failed attempts of one dispatch call, in the order they occurred.
#[derive(Debug, Clone, Default)]
pub struct FailureAggregate {
	records: Vec<FailureRecord>,
}

impl FailureAggregate {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, record: FailureRecord) {
		self.records.push(record);
	}

	/// Appends every record of `other`, keeping its order.
	pub fn extend(&mut self, other: FailureAggregate) {
		self.records.extend(other.records);
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.records.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	#[inline]
	pub fn records(&self) -> &[FailureRecord] {
		&self.records
	}

	/// Renders the multi-line diagnostic, one block per record.
	pub fn render(&self) -> String {
		format::render(&self.records)
	}

	pub fn into_failure(self) -> FailedValidation {
		FailedValidation::from_aggregate(self)
	}
}

impl fmt::Display for FailureAggregate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}
