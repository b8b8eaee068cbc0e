//! Feedback submission component.
//!
//! Reports a thumbs-up/down signal tied to a previously answered query.
//! No idempotency key is attached: sending feedback twice for the same
//! query records two signals server-side, intentionally.

use crate::error::{FeedbackError, error_message};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// A thumbs-up/down rating for an answered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Up,
    Down,
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::Up => write!(f, "up"),
            Feedback::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Feedback::Up),
            "down" => Ok(Feedback::Down),
            other => Err(format!("expected 'up' or 'down', got '{}'", other)),
        }
    }
}

/// Sends feedback signals to the remote service.
pub struct FeedbackClient {
    client: Client,
    base_url: String,
}

impl FeedbackClient {
    /// Creates a new client for the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Sends `feedback` for the query identified by `query_id`.
    ///
    /// Returns the server's confirmation message verbatim. Failure is a
    /// `FeedbackError`; no retry is attempted.
    pub async fn send(
        &self,
        query_id: &str,
        feedback: Feedback,
        token: &str,
    ) -> Result<String, FeedbackError> {
        let request = FeedbackRequest { query_id, feedback };
        let response = self
            .client
            .post(format!("{}/feedback", self.base_url))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|err| FeedbackError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedbackError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let reply: FeedbackReply = response
            .json()
            .await
            .map_err(|err| FeedbackError::InvalidResponse(err.to_string()))?;
        tracing::debug!("recorded {} feedback for query {}", feedback, query_id);
        Ok(reply.message)
    }
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    query_id: &'a str,
    feedback: Feedback,
}

#[derive(Deserialize)]
struct FeedbackReply {
    message: String,
}
