//! Chanwatch common types and utilities.
//!
//! Shared foundation for the chanwatch crates:
//! - Identity types (`PeerId`, `ChatId`, `MonitorSessionId`) with boundary
//!   validation at the platform edge
//! - Unified error type with stable codes and categories
//! - Output format selection for CLI commands

pub mod error;
pub mod id;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, Result};
pub use id::{ChatId, MonitorSessionId, PeerId};
pub use output::OutputFormat;

/// Schema version for machine-readable CLI output.
pub const SCHEMA_VERSION: &str = "1.0.0";
