//! Chanwatch configuration management.
//!
//! This crate provides:
//! - Typed structs matching the chanwatch.json schema
//! - Config file resolution (CLI, environment, XDG, system, builtin)
//! - Environment overrides for containerized deployments
//! - Semantic validation with field-level diagnostics

pub mod monitor;
pub mod resolve;
pub mod validate;

pub use monitor::{BurstSettings, MonitorConfig};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use validate::{validate_burst, validate_monitor, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
