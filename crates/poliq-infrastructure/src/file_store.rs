//! File-backed implementation of the client state store.
//!
//! Each key is persisted as its own file under the state directory, so
//! components writing different keys never touch each other's state.
//! Writes go through a temporary file, an fsync, and an atomic rename:
//! a crashed or failed write leaves the previous value intact.

use crate::paths::PoliqPaths;
use async_trait::async_trait;
use poliq_core::PoliqError;
use poliq_core::error::Result;
use poliq_core::storage::KeyValueStore;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Key-value store that keeps one file per key under a directory.
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Creates a new store rooted at `dir`.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Creates a store at the default location (the poliq state directory).
    pub fn default_location() -> Result<Self> {
        let dir = PoliqPaths::state_dir().map_err(|e| PoliqError::config(e.to_string()))?;
        Self::new(dir)
    }

    /// Returns the file path for a given key.
    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl KeyValueStore for FileStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let tmp_path = self.dir.join(format!(".{}.tmp", key));

        // Write to a temporary file in the same directory
        let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
        tmp_file.write_all(value.as_bytes()).await?;

        // Ensure data is on disk before the rename makes it visible
        tmp_file.sync_all().await?;
        drop(tmp_file);

        // Atomic rename
        tokio::fs::rename(&tmp_path, &path).await?;
        tracing::trace!("state key {} committed", key);

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
