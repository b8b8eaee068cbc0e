//! Persisted query history.
//!
//! The history is an ordered sequence of past queries, newest first, with
//! no de-duplication: resubmitting identical text creates a new entry.
//! Every mutation is mirrored to the persistence port before it is
//! committed in memory, so the persisted copy and the in-memory sequence
//! never disagree about a completed operation.

use crate::error::Result;
use crate::query::QueryResponse;
use crate::storage::{KEY_HISTORY, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default maximum number of retained history entries.
///
/// Oldest entries are evicted once the cap is exceeded, bounding the size
/// of the persisted sequence.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// A persisted record of one past query and its (possibly absent) response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Stable unique identifier (UUID format), assigned at creation.
    pub id: String,
    /// The question text as submitted.
    pub text: String,
    /// Name of the document the query was bound to, copied at submission
    /// time. Later document changes do not retroactively alter history.
    pub document: String,
    /// The structured answer, if the query resolved.
    pub response: Option<QueryResponse>,
    /// Submission timestamp (ISO 8601 format).
    pub timestamp: String,
}

impl HistoryEntry {
    /// Creates a new entry stamped with the current time and a fresh id.
    pub fn new(
        text: impl Into<String>,
        document: impl Into<String>,
        response: Option<QueryResponse>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            document: document.into(),
            response,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Owns the ordered list of past queries and mirrors every mutation to
/// the persistence port.
///
/// `HistoryStore` is responsible for:
/// - Restoring the sequence from storage at startup
/// - Appending new entries (newest first)
/// - Removing entries by their stable id
/// - Enforcing the retention cap
pub struct HistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl HistoryStore {
    /// Restores the history from storage with the default retention cap.
    ///
    /// A missing key yields an empty history. A stored value that fails to
    /// parse is discarded (with a warning) rather than treated as fatal:
    /// the user can always rebuild history by asking new questions.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::load_with_limit(store, DEFAULT_HISTORY_LIMIT).await
    }

    /// Restores the history from storage with a custom retention cap.
    pub async fn load_with_limit(store: Arc<dyn KeyValueStore>, limit: usize) -> Result<Self> {
        let entries = match store.get(KEY_HISTORY).await? {
            Some(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("discarding unparseable query history: {}", err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            entries: RwLock::new(entries),
            store,
            limit,
        })
    }

    /// Inserts `entry` at the front of the sequence and persists it.
    ///
    /// Entries beyond the retention cap are evicted from the oldest end.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence cannot be persisted; the in-memory
    /// sequence is left unchanged in that case.
    pub async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut next = self.entries.read().await.clone();
        next.insert(0, entry);
        if next.len() > self.limit {
            let evicted = next.len() - self.limit;
            next.truncate(self.limit);
            tracing::debug!("evicted {} oldest history entries (cap {})", evicted, self.limit);
        }

        self.persist(&next).await?;
        *self.entries.write().await = next;
        Ok(())
    }

    /// Removes the entry with the given id and persists the sequence.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The entry existed and was removed
    /// - `Ok(false)`: No entry with that id
    /// - `Err(_)`: The sequence could not be persisted; nothing changed
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut next = self.entries.read().await.clone();
        let before = next.len();
        next.retain(|entry| entry.id != id);
        if next.len() == before {
            return Ok(false);
        }

        self.persist(&next).await?;
        *self.entries.write().await = next;
        Ok(true)
    }

    /// Returns a snapshot of the sequence, newest first.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    /// Finds an entry by its id.
    pub async fn find(&self, id: &str) -> Option<HistoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// Number of retained entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the history is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(KEY_HISTORY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoliqError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Mock KeyValueStore for testing
    struct MockStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                values: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for MockStore {
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

    // Store whose writes always fail, for commit-ordering tests
    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(PoliqError::storage("disk full"))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn entry(text: &str) -> HistoryEntry {
        HistoryEntry::new(
            text,
            "policy.pdf",
            Some(QueryResponse::from_answer("$500", "q1")),
        )
    }

    #[tokio::test]
    async fn test_load_empty() {
        let store = Arc::new(MockStore::new());
        let history = HistoryStore::load(store).await.unwrap();
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn test_append_is_newest_first_and_persisted() {
        let store = Arc::new(MockStore::new());
        let history = HistoryStore::load(store.clone()).await.unwrap();

        history.append(entry("first question")).await.unwrap();
        history.append(entry("second question")).await.unwrap();

        let entries = history.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "second question");
        assert_eq!(entries[1].text, "first question");

        // Reload from the same store: persisted copy matches
        let restored = HistoryStore::load(store).await.unwrap();
        assert_eq!(restored.entries().await, entries);
    }

    #[tokio::test]
    async fn test_no_deduplication() {
        let store = Arc::new(MockStore::new());
        let history = HistoryStore::load(store).await.unwrap();

        history.append(entry("same question")).await.unwrap();
        history.append(entry("same question")).await.unwrap();

        let entries = history.entries().await;
        assert_eq!(entries.len(), 2);
        // Identical text, distinct identities
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let store = Arc::new(MockStore::new());
        let history = HistoryStore::load(store.clone()).await.unwrap();

        for i in 0..3 {
            history.append(entry(&format!("question {}", i))).await.unwrap();
        }
        let target = history.entries().await[1].clone();

        assert!(history.remove(&target.id).await.unwrap());
        let entries = history.entries().await;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.id != target.id));

        // Removing an unknown id changes nothing
        assert!(!history.remove("no-such-id").await.unwrap());
        assert_eq!(history.len().await, 2);

        // Removal is persisted
        let restored = HistoryStore::load(store).await.unwrap();
        assert_eq!(restored.len().await, 2);
    }

    #[tokio::test]
    async fn test_retention_cap_evicts_oldest() {
        let store = Arc::new(MockStore::new());
        let history = HistoryStore::load_with_limit(store, 3).await.unwrap();

        for i in 0..5 {
            history.append(entry(&format!("question {}", i))).await.unwrap();
        }

        let entries = history.entries().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "question 4");
        assert_eq!(entries[2].text, "question 2");
    }

    #[tokio::test]
    async fn test_corrupt_history_restores_to_empty() {
        let store = Arc::new(MockStore::new());
        store.set(KEY_HISTORY, "not json at all").await.unwrap();

        let history = HistoryStore::load(store).await.unwrap();
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_memory_unchanged() {
        let history = HistoryStore::load(Arc::new(FailingStore)).await.unwrap();

        let result = history.append(entry("doomed question")).await;
        assert!(result.is_err());
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn test_find() {
        let store = Arc::new(MockStore::new());
        let history = HistoryStore::load(store).await.unwrap();

        history.append(entry("findable question")).await.unwrap();
        let id = history.entries().await[0].id.clone();

        let found = history.find(&id).await.unwrap();
        assert_eq!(found.text, "findable question");
        assert!(history.find("missing").await.is_none());
    }
}
