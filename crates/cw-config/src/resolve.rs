//! Configuration file resolution.
//!
//! Locates chanwatch.json using a priority chain:
//! 1. CLI argument
//! 2. `CHANWATCH_CONFIG` (file path)
//! 3. `CHANWATCH_CONFIG_DIR` (directory containing chanwatch.json)
//! 4. XDG config directory (`~/.config/chanwatch/`)
//! 5. System config directory (`/etc/chanwatch/`)
//! 6. Builtin defaults (no file)

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a config file.
pub const ENV_CONFIG_PATH: &str = "CHANWATCH_CONFIG";

/// Environment variable pointing at a config directory.
pub const ENV_CONFIG_DIR: &str = "CHANWATCH_CONFIG_DIR";

/// Config file name searched in config directories.
pub const CONFIG_FILENAME: &str = "chanwatch.json";

/// Application name used for XDG and system paths.
pub const APP_NAME: &str = "chanwatch";

/// Where a config file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Explicit path from a CLI argument.
    CliArgument,
    /// Path from an environment variable.
    Environment,
    /// XDG user config directory.
    XdgConfig,
    /// System-wide config directory.
    SystemConfig,
    /// No file found; builtin defaults in effect.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Resolved config path and its provenance.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to chanwatch.json, `None` when defaults apply.
    pub monitor: Option<PathBuf>,
    /// Where the path came from.
    pub monitor_source: ConfigSource,
}

/// Resolve the monitor config location.
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPaths {
    let mut paths = ConfigPaths::default();
    paths.monitor = resolve_single_config(cli_path, &mut paths.monitor_source);
    paths
}

fn resolve_single_config(cli_path: Option<&Path>, source: &mut ConfigSource) -> Option<PathBuf> {
    // 1. CLI argument
    if let Some(path) = cli_path {
        if path.exists() {
            *source = ConfigSource::CliArgument;
            return Some(path.to_path_buf());
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    // 4. XDG config directory
    if let Some(xdg) = xdg_config_dir() {
        let path = xdg.join(CONFIG_FILENAME);
        if path.exists() {
            *source = ConfigSource::XdgConfig;
            return Some(path);
        }
    }

    // 5. System config
    let system_path = system_config_dir().join(CONFIG_FILENAME);
    if system_path.exists() {
        *source = ConfigSource::SystemConfig;
        return Some(system_path);
    }

    // 6. Built-in default (None)
    *source = ConfigSource::BuiltinDefault;
    None
}

/// XDG config directory for chanwatch (`~/.config/chanwatch`).
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

/// System-wide config directory (`/etc/chanwatch`).
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
