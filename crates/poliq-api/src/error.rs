//! Error taxonomy for the remote service components.
//!
//! One enum per component concern. Every remote-call failure is caught at
//! the component boundary and turned into one of these types; none are
//! retried automatically and none are fatal to the process.

use poliq_core::PoliqError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Local precondition violations, detected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Query text was empty after trimming whitespace.
    #[error("query text is empty")]
    EmptyQuery,

    /// No document with a server-assigned id is bound.
    #[error("no document is bound; upload a document first")]
    DocumentNotBound,
}

/// Errors from login, registration, or logout.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The server rejected the credentials or the request.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a reply.
    #[error("request failed: {0}")]
    Network(String),

    /// The reply could not be parsed.
    #[error("unexpected reply from server: {0}")]
    InvalidResponse(String),

    /// The token could not be persisted or cleared.
    #[error(transparent)]
    Storage(#[from] PoliqError),
}

/// Errors from document upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The selected file could not be read.
    #[error("could not read {path}: {message}")]
    File { path: String, message: String },

    /// The server rejected the upload.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a reply.
    #[error("request failed: {0}")]
    Network(String),

    /// The reply could not be parsed.
    #[error("unexpected reply from server: {0}")]
    InvalidResponse(String),

    /// The document reference could not be persisted.
    #[error(transparent)]
    Storage(#[from] PoliqError),
}

/// Errors from query submission.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A precondition failed locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server rejected the query.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a reply.
    #[error("request failed: {0}")]
    Network(String),

    /// The reply could not be parsed.
    #[error("unexpected reply from server: {0}")]
    InvalidResponse(String),

    /// A newer submission was issued before this reply arrived; the
    /// reply was discarded instead of overwriting the newer result.
    #[error("superseded by a newer query")]
    Superseded,
}

/// Errors from feedback submission.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// The server rejected the feedback.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a reply.
    #[error("request failed: {0}")]
    Network(String),

    /// The reply could not be parsed.
    #[error("unexpected reply from server: {0}")]
    InvalidResponse(String),
}

/// Error reply shape used by the service.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    error: Option<String>,
}

/// Extracts the human-readable message from an error reply.
///
/// The service reports errors as JSON with a `detail` or `error` field;
/// absent either, the HTTP status text is used.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|reply| reply.detail.or(reply.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        let message = error_message(
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"Invalid credentials"}"#,
        );
        assert_eq!(message, "Invalid credentials");
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        let message = error_message(StatusCode::BAD_REQUEST, r#"{"error":"bad request body"}"#);
        assert_eq!(message, "bad request body");
    }

    #[test]
    fn test_error_message_falls_back_to_status_text() {
        let message = error_message(StatusCode::INTERNAL_SERVER_ERROR, "not json");
        assert_eq!(message, "Internal Server Error");

        let message = error_message(StatusCode::NOT_FOUND, "{}");
        assert_eq!(message, "Not Found");
    }
}
