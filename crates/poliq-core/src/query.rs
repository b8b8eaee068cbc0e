//! Query response domain model.

use serde::{Deserialize, Serialize};

/// The structured answer returned for a query.
///
/// The service currently answers with a single text block; `details` and
/// `suggestions` stay empty and are reserved for structured answers.
/// `query_id` is the only link back to the server-side record and is
/// required to submit feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Answer text as returned by the service.
    pub summary: String,
    /// Supporting detail lines.
    #[serde(default)]
    pub details: Vec<String>,
    /// Follow-up suggestions.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Server-side identifier of the query record.
    pub query_id: String,
}

impl QueryResponse {
    /// Builds a response from the service's plain-text answer.
    pub fn from_answer(answer: impl Into<String>, query_id: impl Into<String>) -> Self {
        Self {
            summary: answer.into(),
            details: Vec::new(),
            suggestions: Vec::new(),
            query_id: query_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_answer() {
        let response = QueryResponse::from_answer("$500", "q1");
        assert_eq!(response.summary, "$500");
        assert!(response.details.is_empty());
        assert!(response.suggestions.is_empty());
        assert_eq!(response.query_id, "q1");
    }

    #[test]
    fn test_deserialize_without_reserved_fields() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"summary":"$500","query_id":"q1"}"#).unwrap();
        assert!(response.details.is_empty());
        assert!(response.suggestions.is_empty());
    }
}
