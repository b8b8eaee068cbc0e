//! Client configuration file storage.
//!
//! Loads `config.toml` from the poliq config directory into the typed
//! `AppConfig` model. A missing file is not an error: the defaults cover
//! the common local-development setup.

use crate::paths::PoliqPaths;
use poliq_core::PoliqError;
use poliq_core::config::AppConfig;
use poliq_core::error::Result;
use std::fs;
use std::path::PathBuf;

/// Storage for the client configuration file (config.toml).
///
/// Responsibilities:
/// - Load config.toml from the poliq config directory
/// - Parse TOML into the AppConfig model
/// - Fall back to defaults when no file exists
///
/// Does NOT:
/// - Write or modify the config file (read-only)
/// - Apply environment overrides (done by the consumer)
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates storage with the default path (config.toml in the poliq
    /// config directory).
    pub fn new() -> Result<Self> {
        let path = PoliqPaths::config_file().map_err(|e| PoliqError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(AppConfig)`: Parsed file, or defaults if the file is missing
    ///   or empty
    /// - `Err(_)`: The file exists but could not be read or parsed
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Returns the path to the config file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
