//! Shared wiring for the CLI commands.

use anyhow::{Context, Result};
use poliq_api::{DocumentSession, FeedbackClient, QueryEngine, SessionStore};
use poliq_application::QueryUseCase;
use poliq_core::history::HistoryStore;
use poliq_core::storage::KeyValueStore;
use poliq_infrastructure::{ConfigStorage, FileStateStore};
use std::sync::Arc;

/// Fully wired client components for one CLI invocation.
pub struct AppContext {
    pub session: Arc<SessionStore>,
    pub documents: Arc<DocumentSession>,
    pub history: Arc<HistoryStore>,
    pub usecase: QueryUseCase,
}

/// Builds the components against the configured service and the default
/// on-disk state store.
pub async fn init() -> Result<AppContext> {
    let base_url = base_url()?;
    tracing::debug!("using service at {}", base_url);

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStateStore::default_location().context("failed to open the state directory")?,
    );

    let session = Arc::new(SessionStore::load(base_url.clone(), store.clone()).await?);
    let documents = Arc::new(DocumentSession::load(base_url.clone(), store.clone()).await?);
    let engine = Arc::new(QueryEngine::new(base_url.clone()));
    let history = Arc::new(HistoryStore::load(store.clone()).await?);
    let feedback = Arc::new(FeedbackClient::new(base_url));

    let usecase = QueryUseCase::new(
        session.clone(),
        documents.clone(),
        engine,
        history.clone(),
        feedback,
    );

    Ok(AppContext {
        session,
        documents,
        history,
        usecase,
    })
}

/// Resolves the service base URL.
///
/// Priority:
/// 1. `POLIQ_BASE_URL` environment variable
/// 2. `config.toml` in the poliq config directory
/// 3. Built-in default (`http://localhost:8000`)
fn base_url() -> Result<String> {
    let config = ConfigStorage::new()?
        .load()
        .context("failed to load config.toml")?;

    let mut base_url = config.server.base_url;
    if let Ok(url) = std::env::var("POLIQ_BASE_URL") {
        if !url.is_empty() {
            base_url = url;
        }
    }

    // Endpoint paths are joined with a leading slash
    Ok(base_url.trim_end_matches('/').to_string())
}
