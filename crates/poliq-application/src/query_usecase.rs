//! Query workflow use case.
//!
//! Coordinates the components the way the surrounding UI does: a question
//! goes to the engine with the current token and document binding, a
//! successful answer is appended to history and becomes the "displayed"
//! response, and feedback is sent for the displayed response's query id.
//! There is no centralized error channel between the components, so this
//! layer aggregates their typed errors with anyhow context.

use anyhow::{Context, Result};
use poliq_api::{DocumentSession, Feedback, FeedbackClient, QueryEngine, SessionStore};
use poliq_core::history::{HistoryEntry, HistoryStore};
use poliq_core::query::QueryResponse;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Use case for submitting queries and rating their answers.
pub struct QueryUseCase {
    /// Auth token owner
    session: Arc<SessionStore>,
    /// Bound document owner
    documents: Arc<DocumentSession>,
    /// Query submission
    engine: Arc<QueryEngine>,
    /// Persisted query history
    history: Arc<HistoryStore>,
    /// Feedback submission
    feedback: Arc<FeedbackClient>,
    /// The response currently shown to the user, if any
    displayed: RwLock<Option<QueryResponse>>,
}

impl QueryUseCase {
    /// Creates a new `QueryUseCase` over the given components.
    pub fn new(
        session: Arc<SessionStore>,
        documents: Arc<DocumentSession>,
        engine: Arc<QueryEngine>,
        history: Arc<HistoryStore>,
        feedback: Arc<FeedbackClient>,
    ) -> Self {
        Self {
            session,
            documents,
            engine,
            history,
            feedback,
            displayed: RwLock::new(None),
        }
    }

    /// Submits a question against the bound document.
    ///
    /// On success the answer is appended to history (with the document
    /// name copied at submission time) and recorded as the displayed
    /// response. Validation of the question text and the document binding
    /// stays in the engine, so an unbound document is reported the same
    /// way regardless of the caller.
    pub async fn ask(&self, text: &str) -> Result<QueryResponse> {
        let token = self
            .session
            .token()
            .await
            .context("not logged in; run `poliq login` first")?;
        let document = self.documents.current().await.unwrap_or_default();

        let response = self.engine.submit(&document, text, &token).await?;

        let entry = HistoryEntry::new(text.trim(), document.name, Some(response.clone()));
        let entry_id = entry.id.clone();
        self.history
            .append(entry)
            .await
            .context("answer received but history could not be persisted")?;
        tracing::debug!("recorded query {} in history", entry_id);

        *self.displayed.write().await = Some(response.clone());
        Ok(response)
    }

    /// Sends a feedback signal for the currently displayed response.
    ///
    /// In a fresh process nothing is displayed yet, so the newest answered
    /// history entry stands in. Without either, the call is refused
    /// locally and nothing is sent.
    pub async fn send_feedback(&self, kind: Feedback) -> Result<String> {
        let token = self
            .session
            .token()
            .await
            .context("not logged in; run `poliq login` first")?;
        let query_id = self
            .displayed_query_id()
            .await
            .context("no answered query to rate yet")?;

        let message = self.feedback.send(&query_id, kind, &token).await?;
        Ok(message)
    }

    /// Restores a past entry's response as the displayed response and
    /// returns the entry, so the caller can re-render question and answer.
    pub async fn reuse(&self, entry_id: &str) -> Result<HistoryEntry> {
        let entry = self
            .history
            .find(entry_id)
            .await
            .with_context(|| format!("no history entry with id {}", entry_id))?;

        *self.displayed.write().await = entry.response.clone();
        Ok(entry)
    }

    /// The response currently shown to the user, if any.
    pub async fn displayed(&self) -> Option<QueryResponse> {
        self.displayed.read().await.clone()
    }

    async fn displayed_query_id(&self) -> Option<String> {
        if let Some(response) = self.displayed.read().await.as_ref() {
            if !response.query_id.is_empty() {
                return Some(response.query_id.clone());
            }
        }

        self.history
            .entries()
            .await
            .into_iter()
            .find_map(|entry| entry.response.map(|response| response.query_id))
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use poliq_core::storage::KeyValueStore;
    use poliq_infrastructure::MemoryStateStore;

    async fn usecase_for(server: &mockito::ServerGuard, store: Arc<MemoryStateStore>) -> QueryUseCase {
        let session = Arc::new(
            SessionStore::load(server.url(), store.clone()).await.unwrap(),
        );
        let documents = Arc::new(
            DocumentSession::load(server.url(), store.clone()).await.unwrap(),
        );
        let engine = Arc::new(QueryEngine::new(server.url()));
        let history = Arc::new(HistoryStore::load(store.clone()).await.unwrap());
        let feedback = Arc::new(FeedbackClient::new(server.url()));
        QueryUseCase::new(session, documents, engine, history, feedback)
    }

    async fn seeded_store() -> Arc<MemoryStateStore> {
        let store = Arc::new(MemoryStateStore::new());
        store
            .set(poliq_core::storage::KEY_SESSION_TOKEN, "tok-1")
            .await
            .unwrap();
        store
            .set(poliq_core::storage::KEY_DOCUMENT_ID, "doc123")
            .await
            .unwrap();
        store
            .set(poliq_core::storage::KEY_DOCUMENT_NAME, "policy.pdf")
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_ask_records_history_and_displayed_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/process-query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer":"$500","query_id":"q1"}"#)
            .create_async()
            .await;

        let store = seeded_store().await;
        let usecase = usecase_for(&server, store.clone()).await;

        let response = usecase.ask("What's my deductible?").await.unwrap();
        assert_eq!(response.summary, "$500");

        let entries: Vec<_> = {
            let raw = store
                .get(poliq_core::storage::KEY_HISTORY)
                .await
                .unwrap()
                .unwrap();
            serde_json::from_str::<Vec<HistoryEntry>>(&raw).unwrap()
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "What's my deductible?");
        assert_eq!(entries[0].document, "policy.pdf");
        assert_eq!(
            entries[0].response.as_ref().unwrap().query_id,
            "q1"
        );

        assert_eq!(usecase.displayed().await.unwrap().query_id, "q1");
    }

    #[tokio::test]
    async fn test_ask_without_login_is_refused_locally() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/process-query")
            .expect(0)
            .create_async()
            .await;

        let store = Arc::new(MemoryStateStore::new());
        let usecase = usecase_for(&server, store).await;

        let err = usecase.ask("What's my deductible?").await.unwrap_err();
        assert!(err.to_string().contains("not logged in"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_query_leaves_history_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/process-query")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"embedding backend unavailable"}"#)
            .create_async()
            .await;

        let store = seeded_store().await;
        let usecase = usecase_for(&server, store.clone()).await;

        assert!(usecase.ask("What's my deductible?").await.is_err());
        assert_eq!(
            store.get(poliq_core::storage::KEY_HISTORY).await.unwrap(),
            None
        );
        assert!(usecase.displayed().await.is_none());
    }

    #[tokio::test]
    async fn test_feedback_uses_displayed_query_id() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/process-query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer":"$500","query_id":"q1"}"#)
            .create_async()
            .await;
        let feedback_mock = server
            .mock("POST", "/feedback")
            .match_body(Matcher::Json(serde_json::json!({
                "query_id": "q1",
                "feedback": "up",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Thanks!"}"#)
            .create_async()
            .await;

        let store = seeded_store().await;
        let usecase = usecase_for(&server, store).await;

        usecase.ask("What's my deductible?").await.unwrap();
        let message = usecase.send_feedback(Feedback::Up).await.unwrap();
        assert_eq!(message, "Thanks!");
        feedback_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_feedback_falls_back_to_newest_answered_entry() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/process-query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer":"$500","query_id":"q1"}"#)
            .create_async()
            .await;
        let feedback_mock = server
            .mock("POST", "/feedback")
            .match_body(Matcher::Json(serde_json::json!({
                "query_id": "q1",
                "feedback": "down",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Noted"}"#)
            .create_async()
            .await;

        let store = seeded_store().await;
        {
            // One process asks...
            let usecase = usecase_for(&server, store.clone()).await;
            usecase.ask("What's my deductible?").await.unwrap();
        }
        // ...and a fresh one rates the answer from restored history.
        let usecase = usecase_for(&server, store).await;
        usecase.send_feedback(Feedback::Down).await.unwrap();
        feedback_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_feedback_without_answer_is_refused_locally() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/feedback")
            .expect(0)
            .create_async()
            .await;

        let store = seeded_store().await;
        let usecase = usecase_for(&server, store).await;

        let err = usecase.send_feedback(Feedback::Up).await.unwrap_err();
        assert!(err.to_string().contains("no answered query"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reuse_restores_displayed_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/process-query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer":"$500","query_id":"q1"}"#)
            .create_async()
            .await;

        let store = seeded_store().await;
        let usecase = usecase_for(&server, store.clone()).await;
        usecase.ask("What's my deductible?").await.unwrap();

        // Fresh process: nothing displayed until a past entry is reused
        let usecase = usecase_for(&server, store).await;
        assert!(usecase.displayed().await.is_none());

        let entries = usecase.history.entries().await;
        let entry = usecase.reuse(&entries[0].id).await.unwrap();
        assert_eq!(entry.text, "What's my deductible?");
        assert_eq!(usecase.displayed().await.unwrap().query_id, "q1");

        assert!(usecase.reuse("no-such-id").await.is_err());
    }
}
