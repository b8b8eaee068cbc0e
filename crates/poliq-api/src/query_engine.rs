//! Query submission component.
//!
//! Submits a natural-language question against a bound document and maps
//! the reply into the structured `QueryResponse`. Preconditions are
//! checked locally before any network traffic; overlapping submissions
//! are tagged with a sequence number so a stale reply is discarded rather
//! than overwriting a newer result.

use crate::error::{QueryError, ValidationError, error_message};
use poliq_core::document::DocumentRef;
use poliq_core::query::QueryResponse;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Submits queries against a bound document.
pub struct QueryEngine {
    client: Client,
    base_url: String,
    /// Number of submissions currently awaiting a reply.
    in_flight: AtomicU64,
    /// Sequence number of the latest issued submission.
    seq: AtomicU64,
}

impl QueryEngine {
    /// Creates a new engine for the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            in_flight: AtomicU64::new(0),
            seq: AtomicU64::new(0),
        }
    }

    /// Whether a submission is currently outstanding.
    ///
    /// Callers use this to disable resubmission while a request is in
    /// flight; it is advisory, not a lock.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Submits `text` against `document` and returns the mapped response.
    ///
    /// # Preconditions (checked before any network call)
    ///
    /// - `text` is non-empty after trimming whitespace
    /// - `document` carries a server-assigned id
    ///
    /// A violation is a `ValidationError` and no request is sent.
    ///
    /// # Errors
    ///
    /// Network and non-2xx failures are a `QueryError`; no retry is
    /// attempted. A reply that is no longer the latest issued submission
    /// yields `QueryError::Superseded` and is otherwise discarded.
    pub async fn submit(
        &self,
        document: &DocumentRef,
        text: &str,
        token: &str,
    ) -> Result<QueryResponse, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        if !document.is_bound() {
            return Err(ValidationError::DocumentNotBound.into());
        }

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = self.send(document, text, token).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("discarding reply for superseded query #{}", seq);
            return Err(QueryError::Superseded);
        }

        let reply = result?;
        Ok(QueryResponse::from_answer(reply.answer, reply.query_id))
    }

    async fn send(
        &self,
        document: &DocumentRef,
        text: &str,
        token: &str,
    ) -> Result<QueryReply, QueryError> {
        let request = QueryRequest {
            document_id: &document.id,
            query: text,
        };
        let response = self
            .client
            .post(format!("{}/process-query", self.base_url))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|err| QueryError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response
            .json()
            .await
            .map_err(|err| QueryError::InvalidResponse(err.to_string()))
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    document_id: &'a str,
    query: &'a str,
}

#[derive(Deserialize)]
struct QueryReply {
    answer: String,
    query_id: String,
}
