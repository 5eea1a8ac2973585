//! Runtime knobs for the validation surfaces.
//!
//! ```toml
//! cache_failures = false
//!
//! [mapping]
//! validate_keys = true
//! validate_values = false
//! ```
//!
//! Every field is optional; missing fields take their defaults and unknown
//! fields are rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::MappingPolicy;

/// Errors that can occur when loading a [`ValidationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to parse validation config: {0}")]
	Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
	/// Which sides of a mapping entry are validated.
	pub mapping: MappingPolicy,
	/// Whether attribute descriptors memoize validator failures per instance.
	pub cache_failures: bool,
}

impl Default for ValidationConfig {
	fn default() -> Self {
		Self {
			mapping: MappingPolicy::BOTH,
			cache_failures: true,
		}
	}
}

impl ValidationConfig {
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}
}
