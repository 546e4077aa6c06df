//! Configuration management.
//!
//! This module handles loading, parsing, and saving of the configuration
//! file. Every section has defaults so a missing or partial file works.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_AUTO_SYNC_INTERVAL_MINUTES;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Auto-sync interval in minutes (0 = disabled, manual sync only)
    pub auto_sync_interval_minutes: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Database URL override. When unset, a file under the platform data
    /// directory is used.
    pub database_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Log level: "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync_interval_minutes: DEFAULT_AUTO_SYNC_INTERVAL_MINUTES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Write this configuration to a specific file, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, raw)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Path of the configuration file under the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(dir.join("tasksync").join("config.toml"))
    }

    /// Database URL to open, honoring the configured override.
    pub fn database_url(&self) -> Result<String> {
        if let Some(url) = &self.storage.database_url {
            return Ok(url.clone());
        }
        let dir = dirs::data_dir().context("could not determine data directory")?;
        let path = dir.join("tasksync").join("tasks.db");
        Ok(format!("sqlite://{}?mode=rwc", path.display()))
    }

    /// Parsed log level for [`crate::logger::init`].
    pub fn log_level(&self) -> log::LevelFilter {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.sync.auto_sync_interval_minutes, 5);
        assert!(!config.logging.enabled);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("[sync]\nauto_sync_interval_minutes = 1\n").unwrap();
        assert_eq!(config.sync.auto_sync_interval_minutes, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn explicit_database_url_wins() {
        let config: Config =
            toml::from_str("[storage]\ndatabase_url = \"sqlite::memory:\"\n").unwrap();
        assert_eq!(config.database_url().unwrap(), "sqlite::memory:");
    }
}
