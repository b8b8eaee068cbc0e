//! Unified path management for poliq configuration and state files.
//!
//! All poliq configuration and persisted client state live under the
//! platform config directory, resolved via the `dirs` crate. This keeps
//! path resolution consistent across Linux, macOS, and Windows.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for poliq.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/poliq/             # Config directory (platform dependent)
/// ├── config.toml              # Client configuration
/// └── state/                   # Persisted client state (one file per key)
///     ├── jwt
///     ├── last_document_id
///     ├── last_document_name
///     └── query_history
/// ```
pub struct PoliqPaths;

impl PoliqPaths {
    /// Returns the poliq configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/poliq/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("poliq"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the client state directory.
    ///
    /// This is where `FileStateStore` keeps its file-per-key values.
    pub fn state_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("state"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = PoliqPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("poliq"));
    }

    #[test]
    fn test_config_file() {
        let config_file = PoliqPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = PoliqPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_state_dir() {
        let state_dir = PoliqPaths::state_dir().unwrap();
        assert!(state_dir.ends_with("state"));
        let config_dir = PoliqPaths::config_dir().unwrap();
        assert!(state_dir.starts_with(&config_dir));
    }
}
