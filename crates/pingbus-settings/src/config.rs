//! Configuration and settings management for pingbus
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats; the default file lives in the platform config
//! directory.
//!
//! Configuration is organized into logical sections:
//! - Event bus settings (async channel capacity, listener panic policy)
//! - Worker settings (thread name, reply timeout)
//! - Logging settings (level, output format)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use pingbus_core::EventBusConfig;
pub use pingbus_core::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Directory name under the platform config directory
const APP_DIR: &str = "pingbus";

/// Default configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSettings {
    /// Capacity of the broadcast channel feeding async receivers
    pub channel_capacity: usize,
    /// What a panicking listener does to the rest of a publish
    pub failure_policy: FailurePolicy,
}

impl Default for BusSettings {
    fn default() -> Self {
        let config = EventBusConfig::default();
        Self {
            channel_capacity: config.channel_capacity,
            failure_policy: config.failure_policy,
        }
    }
}

impl BusSettings {
    /// Build the event bus configuration these settings describe
    pub fn to_bus_config(&self) -> EventBusConfig {
        EventBusConfig {
            channel_capacity: self.channel_capacity,
            failure_policy: self.failure_policy,
        }
    }
}

/// Worker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// OS thread name of the worker
    pub thread_name: String,
    /// How long to wait for a reply, in milliseconds
    pub reply_timeout_ms: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            thread_name: "ping-worker".to_string(),
            reply_timeout_ms: 5000,
        }
    }
}

impl WorkerSettings {
    /// Reply timeout as a `Duration`
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// Single-line human readable output
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingSettings {
    /// Parse the configured level
    pub fn level(&self) -> SettingsResult<tracing::Level> {
        tracing::Level::from_str(self.level.trim()).map_err(|_| {
            ConfigError::InvalidSetting {
                key: "logging.level".to_string(),
                reason: format!("unknown level '{}'", self.level),
            }
            .into()
        })
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
/// Missing sections and keys fall back to their defaults when loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event bus settings
    pub bus: BusSettings,
    /// Worker settings
    pub worker: WorkerSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/pingbus/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("platform config directory not found".to_string())
            })
    }

    /// Load config from an explicit path, else from the default location if
    /// a file exists there, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::warn!("{}; using default settings", e);
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.bus.channel_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "bus.channel_capacity".to_string(),
                value: self.bus.channel_capacity.to_string(),
            }
            .into());
        }

        if self.worker.reply_timeout_ms == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "worker.reply_timeout_ms".to_string(),
                value: self.worker.reply_timeout_ms.to_string(),
            }
            .into());
        }

        if self.worker.thread_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "worker.thread_name".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        self.logging.level()?;
        Ok(())
    }

    /// Merge another config into this one
    ///
    /// A section of `other` replaces ours only if it differs from the
    /// default, so a sparse override file keeps our values elsewhere.
    pub fn merge(&mut self, other: &Config) {
        if other.bus != BusSettings::default() {
            self.bus = other.bus.clone();
        }
        if other.worker != WorkerSettings::default() {
            self.worker = other.worker.clone();
        }
        if other.logging != LoggingSettings::default() {
            self.logging = other.logging.clone();
        }
    }
}
