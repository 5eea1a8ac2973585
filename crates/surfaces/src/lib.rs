//! Host surfaces over the validation engine.
//!
//! Each surface owns a frozen registry built once per owner type and routes
//! inputs through [`vetted_engine`] dispatch:
//!
//! - [`object`]: a type validates arbitrary inputs against its own registry.
//! - [`attr`]: a per-attribute descriptor validates on assignment, with a
//!   per-instance failure cache.
//! - [`mapping`]: an insertion-ordered map validates every entry before it is
//!   stored.
//!
//! [`config`] carries the few runtime knobs (which mapping sides are
//! validated, whether attribute failures are cached) and loads them from TOML.

pub mod attr;
pub mod config;
pub mod mapping;
pub mod object;

pub use attr::{AttrDescriptor, AttrSlot};
pub use config::{ConfigError, ValidationConfig};
pub use mapping::{MappingPolicy, MappingSchema, ValidatedMapping};
pub use object::Validated;
pub use vetted_engine as engine;
