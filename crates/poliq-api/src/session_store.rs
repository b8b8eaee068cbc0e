//! Authentication session component.
//!
//! Owns the bearer token lifecycle: obtain it via login or registration,
//! hand it to the other components, clear it on logout. Every committed
//! token change is mirrored to the persistence port, so a fresh process
//! restores the session.

use crate::error::{AuthError, error_message};
use poliq_core::PoliqError;
use poliq_core::session::Session;
use poliq_core::storage::{KEY_SESSION_TOKEN, KeyValueStore};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the auth token and the login/registration/logout operations.
pub struct SessionStore {
    client: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
    session: RwLock<Session>,
}

impl SessionStore {
    /// Creates the store and restores any persisted token.
    pub async fn load(
        base_url: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, PoliqError> {
        let token = store.get(KEY_SESSION_TOKEN).await?;
        Ok(Self {
            client: Client::new(),
            base_url: base_url.into(),
            store,
            session: RwLock::new(Session { token }),
        })
    }

    /// Logs in with form-encoded credentials.
    ///
    /// On success the token is persisted and kept in memory; the returned
    /// value is the same token. On failure nothing changes and the error
    /// carries the server-provided message (or the HTTP status text).
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let params = [("username", username), ("password", password)];
        let response = self
            .client
            .post(format!("{}/token", self.base_url))
            .form(&params)
            .send()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        let token = Self::parse_token_reply(response).await?;
        self.commit_token(&token).await?;
        tracing::debug!("logged in as {}", username);
        Ok(token)
    }

    /// Registers a new account with a JSON-encoded body.
    ///
    /// Same contract as `login`: the reply carries a token that is
    /// persisted and returned.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let request = RegisterRequest {
            username,
            email,
            password,
        };
        let response = self
            .client
            .post(format!("{}/register", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        let token = Self::parse_token_reply(response).await?;
        self.commit_token(&token).await?;
        tracing::debug!("registered account {}", username);
        Ok(token)
    }

    /// Clears the token and erases its persisted copy.
    ///
    /// Purely local: the server is not informed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(KEY_SESSION_TOKEN).await?;
        self.session.write().await.clear();
        tracing::debug!("logged out");
        Ok(())
    }

    /// Returns the current token, if any.
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    /// Whether a token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    async fn parse_token_reply(response: reqwest::Response) -> Result<String, AuthError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let reply: TokenReply = response
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        Ok(reply.access_token)
    }

    // Persist first, commit in memory second: a storage failure must not
    // leave memory claiming a session the next process won't see.
    async fn commit_token(&self, token: &str) -> Result<(), PoliqError> {
        self.store.set(KEY_SESSION_TOKEN, token).await?;
        self.session.write().await.token = Some(token.to_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenReply {
    access_token: String,
}
