//! Document reference domain model.

use serde::{Deserialize, Serialize};

/// The binding between an uploaded file and the server-assigned document
/// identifier used by subsequent queries.
///
/// A reference is created from a successful upload reply and replaced
/// wholesale by the next upload; `id` and `name` are always set together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Server-assigned document identifier.
    pub id: String,
    /// Locally remembered file name, for display and history records.
    pub name: String,
}

impl DocumentRef {
    /// Creates a new document reference.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Whether the reference carries a server-assigned id.
    ///
    /// A query may only be submitted against a bound reference.
    pub fn is_bound(&self) -> bool {
        !self.id.is_empty()
    }
}
