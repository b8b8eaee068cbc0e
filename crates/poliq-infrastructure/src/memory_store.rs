//! In-memory implementation of the client state store.
//!
//! Intended for tests and for embedding the components without touching
//! the filesystem. Values live only as long as the store instance.

use async_trait::async_trait;
use poliq_core::error::Result;
use poliq_core::storage::KeyValueStore;
use std::collections::HashMap;
use std::sync::Mutex;

/// Key-value store backed by a plain in-memory map.
#[derive(Default)]
pub struct MemoryStateStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
