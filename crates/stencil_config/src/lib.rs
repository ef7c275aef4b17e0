//! Parsing and validation of `stencil.toml` engine configuration files.
//!
//! This crate reads the engine configuration file and produces a
//! strongly-typed [`EngineConfig`] with named, optional fields and documented
//! defaults for the template store, persistent cache, and invalidation
//! ledger locations.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::EngineConfig;
