//! HTTP components for the remote policy Q&A service.
//!
//! Each component owns one slice of client state and one slice of the
//! remote interface: `SessionStore` (auth token), `DocumentSession`
//! (upload and the bound document reference), `QueryEngine` (query
//! submission), and `FeedbackClient` (answer ratings). Failures are typed
//! per component and never retried; the caller decides what to do next.

pub mod document_session;
pub mod error;
pub mod feedback;
pub mod query_engine;
pub mod session_store;

pub use document_session::{DocumentSession, UploadedDocument};
pub use error::{AuthError, FeedbackError, QueryError, UploadError, ValidationError};
pub use feedback::{Feedback, FeedbackClient};
pub use query_engine::QueryEngine;
pub use session_store::SessionStore;
