//! Configuration for the waveform cache.
//!
//! Every field carries a serde default, so an empty TOML document yields the
//! same configuration as [`CacheConfig::default`].

use crate::{
    WaveformError,
    config::{StorageConfig, WorkerConfig},
    error::Result as CoreResult,
};

use std::{fs, panic::Location, path::Path};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Top-level cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Scratch directory settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl CacheConfig {
    /// Parse and validate a TOML document.
    #[track_caller]
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config: CacheConfig =
            toml::from_str(contents).map_err(|e| WaveformError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Load and validate a TOML file.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| WaveformError::ConfigError {
            reason: format!("Failed to read config {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config = Self::from_toml_str(&contents)?;

        info!(config_path = ?path, "Cache configuration loaded");

        Ok(config)
    }

    /// Serialize to a TOML document.
    #[track_caller]
    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| WaveformError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Reject values the coordinator cannot work with.
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        let name = &self.storage.directory_name;
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(WaveformError::ConfigError {
                reason: format!("Scratch directory name must be a single path component: {name:?}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let ext = &self.storage.default_extension;
        if ext.is_empty() || ext.starts_with('.') {
            return Err(WaveformError::ConfigError {
                reason: format!("Default extension must be non-empty without a leading dot: {ext:?}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.worker.queue_capacity == 0 {
            return Err(WaveformError::ConfigError {
                reason: "Worker queue capacity must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.worker.stage_timeout_ms == Some(0) {
            return Err(WaveformError::ConfigError {
                reason: "Stage timeout must be positive".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
