//! Session domain model.

use serde::{Deserialize, Serialize};

/// The authentication state of the client.
///
/// "Authenticated" is exactly `token` being present: the session is
/// created on successful login or registration, destroyed on explicit
/// logout, and restored from the persistence port across restarts. No
/// refresh or expiry check is performed locally; the token is trusted
/// until the server rejects it on a later call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token proving prior successful authentication, if any.
    pub token: Option<String>,
}

impl Session {
    /// Creates an authenticated session holding `token`.
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drops the token, returning the session to the anonymous state.
    pub fn clear(&mut self) {
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.token, None);
    }

    #[test]
    fn test_authenticated_and_clear() {
        let mut session = Session::authenticated("abc123");
        assert!(session.is_authenticated());

        session.clear();
        assert!(!session.is_authenticated());
    }
}
