//! Error types for chanwatch.
//!
//! Unified error handling across the workspace:
//! - Stable numeric codes, grouped by concern, for machine consumers
//! - Category classification for coarse grouping
//! - Recoverability hints and remediation text for the CLI

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using the chanwatch error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration loading and validation.
    Config,
    /// Participant records crossing the platform boundary.
    Record,
    /// File and stream I/O, including serialization.
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Record => write!(f, "record"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for chanwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig { field: String, message: String },

    // Record errors (20-29)
    #[error("invalid participant record: {message}")]
    InvalidRecord { message: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code for machine consumption.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig { .. } => 11,
            Error::InvalidRecord { .. } => 20,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Category for coarse error grouping.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig { .. } => ErrorCategory::Config,
            Error::InvalidRecord { .. } => ErrorCategory::Record,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether retrying after operator action can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Fixable by editing the config or environment
            Error::Config(_) => true,
            Error::InvalidConfig { .. } => true,
            // The capture itself is malformed
            Error::InvalidRecord { .. } => false,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// One-line summary for the start of human-facing error output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration could not be loaded",
            Error::InvalidConfig { .. } => "Configuration failed validation",
            Error::InvalidRecord { .. } => "Participant record rejected",
            Error::Io(_) => "File operation failed",
            Error::Json(_) => "JSON input could not be parsed",
        }
    }

    /// Suggested fix, rendered beneath the headline.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check the config path and CHANWATCH_CONFIG, or run 'chanwatch check'",
            Error::InvalidConfig { .. } => "Correct the named field in chanwatch.json and re-run 'chanwatch check'",
            Error::InvalidRecord { .. } => "Every record needs a nonzero integer id; re-export the roster capture",
            Error::Io(_) => "Verify the path exists and is readable",
            Error::Json(_) => "Validate the input with a JSON linter and retry",
        }
    }
}

/// Format an error for human-readable stderr output.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
