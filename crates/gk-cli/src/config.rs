//! Application configuration.

use crate::error::{AppError, AppResult};
use gk_api::ApiConfig;
use gk_console::{AnsiMode, ShellConfig, DEFAULT_LOG_CAPACITY};
use gk_ws::LogStreamConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Log view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Lines kept in the live view.
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
    /// Colour code handling ("strip" or "markup").
    #[serde(default)]
    pub ansi: AnsiMode,
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
            ansi: AnsiMode::default(),
        }
    }
}

/// Dashboard refresh intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_roster_interval_ms")]
    pub roster_interval_ms: u64,
    #[serde(default = "default_health_interval_ms")]
    pub health_interval_ms: u64,
}

fn default_roster_interval_ms() -> u64 {
    5_000
}

fn default_health_interval_ms() -> u64 {
    60_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            roster_interval_ms: default_roster_interval_ms(),
            health_interval_ms: default_health_interval_ms(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session file (token and server address).
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log_stream: LogStreamConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

fn default_session_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gatekeeper")
        .join("session.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_path: default_session_path(),
            api: ApiConfig::default(),
            log_stream: LogStreamConfig::default(),
            log: LogConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields defaults.
    pub fn load(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            warn!(path, "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.log.capacity == 0 {
            return Err(AppError::Config("log.capacity must be positive".to_string()));
        }
        if self.polling.roster_interval_ms == 0 || self.polling.health_interval_ms == 0 {
            return Err(AppError::Config(
                "polling intervals must be positive".to_string(),
            ));
        }
        if self.log_stream.keepalive_interval_ms == 0 {
            return Err(AppError::Config(
                "log_stream.keepalive_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn shell_config(&self) -> ShellConfig {
        ShellConfig {
            log_stream: self.log_stream.clone(),
            log_capacity: self.log.capacity,
            ansi: self.log.ansi,
            roster_interval: Duration::from_millis(self.polling.roster_interval_ms),
            health_interval: Duration::from_millis(self.polling.health_interval_ms),
        }
    }
}
