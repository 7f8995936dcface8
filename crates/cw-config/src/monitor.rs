//! Monitor configuration types.
//!
//! These types match the chanwatch.json schema. Builtin defaults mirror
//! the deployed tuning: 10 second scan cycles, a status line every 10
//! cycles, and burst detection at 3 events in a 30 second window.

use serde::{Deserialize, Serialize};
use std::path::Path;

use cw_common::ChatId;

use crate::resolve::{resolve_config, ConfigSource};
use crate::validate::{validate_monitor, ValidationError, ValidationResult};
use crate::CONFIG_SCHEMA_VERSION;

/// Complete monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Schema version, must match [`CONFIG_SCHEMA_VERSION`].
    pub schema_version: String,

    /// Optional free-form description of the deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Group whose voice chat is monitored.
    pub target_chat: ChatId,

    /// Chat receiving ban notices and status reports.
    pub log_chat: ChatId,

    /// Seconds between roster scans.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,

    /// Emit a status line every N scan cycles.
    #[serde(default = "default_status_every")]
    pub status_every_cycles: u64,

    /// Burst (mute spam) detection settings.
    #[serde(default)]
    pub burst: BurstSettings,
}

/// Burst detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstSettings {
    /// Trailing window in seconds.
    #[serde(default = "default_time_window")]
    pub time_window_secs: u64,

    /// Events inside the window that raise an alarm.
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    /// Raw events retained per identity.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_scan_interval() -> u64 {
    10
}

fn default_status_every() -> u64 {
    10
}

fn default_time_window() -> u64 {
    30
}

fn default_threshold() -> u32 {
    3
}

fn default_history_capacity() -> usize {
    10
}

impl Default for BurstSettings {
    fn default() -> Self {
        BurstSettings {
            time_window_secs: default_time_window(),
            threshold: default_threshold(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            // Deployment defaults carried over from the original rollout;
            // real installs override these via file or environment.
            target_chat: ChatId(-1001887313554),
            log_chat: ChatId(-1003021229800),
            scan_interval_secs: default_scan_interval(),
            status_every_cycles: default_status_every(),
            burst: BurstSettings::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Resolve, load, override, and validate in one step.
    ///
    /// Missing files are not an error; builtin defaults apply. Returns
    /// the validated config together with where it came from.
    pub fn load(cli_path: Option<&Path>) -> ValidationResult<(Self, ConfigSource)> {
        let paths = resolve_config(cli_path);
        let mut config = match &paths.monitor {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        validate_monitor(&config)?;
        Ok((config, paths.monitor_source))
    }

    /// Apply environment overrides on top of the loaded file.
    ///
    /// Recognized variables:
    /// - `CHANWATCH_TARGET_CHAT`
    /// - `CHANWATCH_LOG_CHAT`
    /// - `CHANWATCH_SCAN_INTERVAL`
    /// - `CHANWATCH_TIME_WINDOW`
    /// - `CHANWATCH_BURST_THRESHOLD`
    pub fn apply_env_overrides(&mut self) -> ValidationResult<()> {
        if let Some(raw) = env_override::<i64>("CHANWATCH_TARGET_CHAT")? {
            self.target_chat = ChatId(raw);
        }
        if let Some(raw) = env_override::<i64>("CHANWATCH_LOG_CHAT")? {
            self.log_chat = ChatId(raw);
        }
        if let Some(raw) = env_override::<u64>("CHANWATCH_SCAN_INTERVAL")? {
            self.scan_interval_secs = raw;
        }
        if let Some(raw) = env_override::<u64>("CHANWATCH_TIME_WINDOW")? {
            self.burst.time_window_secs = raw;
        }
        if let Some(raw) = env_override::<u32>("CHANWATCH_BURST_THRESHOLD")? {
            self.burst.threshold = raw;
        }
        Ok(())
    }
}

/// Read and parse one environment override, distinguishing "unset" from
/// "set but unparseable".
fn env_override<T: std::str::FromStr>(name: &str) -> ValidationResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ValidationError::InvalidValue {
                field: name.to_string(),
                message: format!("cannot parse '{}': {}", raw, e),
            }),
        Err(_) => Ok(None),
    }
}
