//! Configuration validation.
//!
//! Structural problems (missing files, bad JSON) and semantic problems
//! (zero chat ids, burst settings that can never fire) are both reported
//! as [`ValidationError`] with a stable code and a field-level message.

use thiserror::Error;

use crate::monitor::{BurstSettings, MonitorConfig};
use crate::CONFIG_SCHEMA_VERSION;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation errors with stable codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic error: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Stable numeric code for machine consumption.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 62,
            ValidationError::MissingField(_) => 63,
            ValidationError::InvalidValue { .. } => 64,
            ValidationError::VersionMismatch { .. } => 65,
        }
    }
}

impl From<ValidationError> for cw_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidValue { field, message } => {
                cw_common::Error::InvalidConfig { field, message }
            }
            other => cw_common::Error::Config(other.to_string()),
        }
    }
}

/// Validate a monitor configuration.
pub fn validate_monitor(config: &MonitorConfig) -> ValidationResult<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.target_chat.get() == 0 {
        return Err(ValidationError::InvalidValue {
            field: "target_chat".to_string(),
            message: "must be a nonzero chat id".to_string(),
        });
    }

    if config.log_chat.get() == 0 {
        return Err(ValidationError::InvalidValue {
            field: "log_chat".to_string(),
            message: "must be a nonzero chat id".to_string(),
        });
    }

    if config.scan_interval_secs == 0 {
        return Err(ValidationError::InvalidValue {
            field: "scan_interval_secs".to_string(),
            message: "must be positive".to_string(),
        });
    }

    if config.status_every_cycles == 0 {
        return Err(ValidationError::InvalidValue {
            field: "status_every_cycles".to_string(),
            message: "must be positive".to_string(),
        });
    }

    validate_burst(&config.burst)
}

/// Validate burst detection settings.
pub fn validate_burst(burst: &BurstSettings) -> ValidationResult<()> {
    if burst.threshold == 0 {
        return Err(ValidationError::InvalidValue {
            field: "burst.threshold".to_string(),
            message: "must be positive".to_string(),
        });
    }

    if burst.time_window_secs == 0 {
        return Err(ValidationError::InvalidValue {
            field: "burst.time_window_secs".to_string(),
            message: "must be positive".to_string(),
        });
    }

    // With fewer retained events than the threshold, the detector can
    // never observe enough events to alarm. Reject instead of resizing.
    if burst.history_capacity < burst.threshold as usize {
        return Err(ValidationError::InvalidValue {
            field: "burst.history_capacity".to_string(),
            message: format!(
                "must be >= threshold ({}), got {}",
                burst.threshold, burst.history_capacity
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_common::ChatId;

    fn valid_config() -> MonitorConfig {
        MonitorConfig {
            target_chat: ChatId(-1001111111111),
            log_chat: ChatId(-1002222222222),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_monitor(&valid_config()).is_ok());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut config = valid_config();
        config.schema_version = "0.9.0".to_string();
        let err = validate_monitor(&config).unwrap_err();
        assert!(matches!(err, ValidationError::VersionMismatch { .. }));
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn test_zero_chat_ids_rejected() {
        let mut config = valid_config();
        config.target_chat = ChatId(0);
        let err = validate_monitor(&config).unwrap_err();
        match err {
            ValidationError::InvalidValue { field, .. } => assert_eq!(field, "target_chat"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_scan_interval_rejected() {
        let mut config = valid_config();
        config.scan_interval_secs = 0;
        assert!(validate_monitor(&config).is_err());
    }

    #[test]
    fn test_burst_zero_threshold_rejected() {
        let burst = BurstSettings {
            threshold: 0,
            ..BurstSettings::default()
        };
        let err = validate_burst(&burst).unwrap_err();
        match err {
            ValidationError::InvalidValue { field, .. } => assert_eq!(field, "burst.threshold"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_burst_zero_window_rejected() {
        let burst = BurstSettings {
            time_window_secs: 0,
            ..BurstSettings::default()
        };
        assert!(validate_burst(&burst).is_err());
    }

    #[test]
    fn test_burst_capacity_below_threshold_rejected() {
        let burst = BurstSettings {
            threshold: 5,
            history_capacity: 4,
            ..BurstSettings::default()
        };
        let err = validate_burst(&burst).unwrap_err();
        match err {
            ValidationError::InvalidValue { field, message } => {
                assert_eq!(field, "burst.history_capacity");
                assert!(message.contains("threshold"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_burst_capacity_equal_threshold_allowed() {
        let burst = BurstSettings {
            threshold: 10,
            history_capacity: 10,
            ..BurstSettings::default()
        };
        assert!(validate_burst(&burst).is_ok());
    }

    #[test]
    fn test_conversion_to_common_error() {
        let err = ValidationError::InvalidValue {
            field: "burst.threshold".to_string(),
            message: "must be positive".to_string(),
        };
        let common: cw_common::Error = err.into();
        assert_eq!(common.code(), 11);
    }
}
