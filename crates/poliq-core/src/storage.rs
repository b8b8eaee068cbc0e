//! Persistence port for client state.
//!
//! Models the browser-local key-value storage of the upstream client as an
//! explicit port. Each stateful component receives the store by injection
//! and owns exactly its own keys: it loads them at construction, writes
//! them on every committed mutation, and clears them only on explicit
//! logout/removal.

use crate::error::Result;
use async_trait::async_trait;

/// Storage key for the session token.
pub const KEY_SESSION_TOKEN: &str = "jwt";

/// Storage key for the id of the last uploaded document.
pub const KEY_DOCUMENT_ID: &str = "last_document_id";

/// Storage key for the display name of the last uploaded document.
pub const KEY_DOCUMENT_NAME: &str = "last_document_name";

/// Storage key for the persisted query history.
pub const KEY_HISTORY: &str = "query_history";

/// An abstract key-value store for process-wide client state.
///
/// This trait defines the contract for persisting small pieces of client
/// state (session token, document reference, query history), decoupling
/// the components from the specific storage mechanism (files on disk,
/// in-memory map for tests).
///
/// # Implementation Notes
///
/// Implementations must make `set` all-or-nothing: a failed write must
/// never leave a partially written value behind, since callers treat a
/// stored value as a committed state transition.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: A value is stored under the key
    /// - `Ok(None)`: Nothing is stored under the key
    /// - `Err(_)`: Error occurred during retrieval
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Value committed
    /// - `Err(_)`: Error occurred; the previous value is unchanged
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`.
    ///
    /// Removing a key that is not present is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
