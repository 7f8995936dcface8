//! Exit codes for the chanwatch CLI.
//!
//! Exit codes communicate outcome to scripts without output parsing.
//!
//! Ranges:
//! - 0-6: operational outcomes
//! - 10-19: user and environment errors
//! - 20-29: internal errors

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed, nothing flagged.
    Clean = 0,
    /// Run completed with channel detections.
    DetectionsFound = 1,
    /// Run completed with burst alarms.
    AlarmsRaised = 2,

    /// Invalid command-line arguments or input.
    ArgsError = 10,
    /// Configuration missing or failed validation.
    ConfigError = 11,
    /// Participant records rejected at the boundary.
    RecordError = 12,

    /// Unexpected internal failure.
    InternalError = 20,
    /// I/O failure reading input or writing output.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Operational outcome, not an error.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    pub fn is_internal_error(self) -> bool {
        let code = self as i32;
        (20..30).contains(&code)
    }

    pub fn is_error(self) -> bool {
        !self.is_operational()
    }

    /// Stable symbolic name for logs and JSON output.
    pub fn code_name(self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::DetectionsFound => "OK_DETECTIONS",
            ExitCode::AlarmsRaised => "OK_ALARMS",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::RecordError => "ERR_RECORDS",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.code_name())
    }
}
