//! Document upload component.
//!
//! Owns the binding between an uploaded file and the server-assigned
//! document id. The binding is replaced wholesale on each successful
//! upload and persisted so a fresh process can keep querying the same
//! document. No client-side validation of file type or size is performed;
//! the server is trusted to reject what it cannot process.

use crate::error::{UploadError, error_message};
use poliq_core::PoliqError;
use poliq_core::document::DocumentRef;
use poliq_core::storage::{KEY_DOCUMENT_ID, KEY_DOCUMENT_NAME, KeyValueStore};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedDocument {
    /// The new binding used by subsequent queries.
    pub document: DocumentRef,
    /// Preview of the extracted text, when the service provides one.
    pub snippet: Option<String>,
}

/// Owns the currently bound document reference and the upload operation.
pub struct DocumentSession {
    client: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<DocumentRef>>,
}

impl DocumentSession {
    /// Creates the session and restores any persisted document reference.
    pub async fn load(
        base_url: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, PoliqError> {
        let id = store.get(KEY_DOCUMENT_ID).await?;
        let name = store.get(KEY_DOCUMENT_NAME).await?;
        let current = id.map(|id| DocumentRef {
            id,
            name: name.unwrap_or_default(),
        });

        Ok(Self {
            client: Client::new(),
            base_url: base_url.into(),
            store,
            current: RwLock::new(current),
        })
    }

    /// Returns the currently bound document reference, if any.
    pub async fn current(&self) -> Option<DocumentRef> {
        self.current.read().await.clone()
    }

    /// Uploads the file at `path` and binds the returned document id.
    ///
    /// The server reply is awaited fully before any state is updated: on
    /// failure the previous reference is left untouched, in memory and on
    /// disk, and the error is reported without retry.
    pub async fn upload(&self, path: &Path, token: &str) -> Result<UploadedDocument, UploadError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| UploadError::File {
                path: path.display().to_string(),
                message: "not a regular file name".to_string(),
            })?;

        let bytes = tokio::fs::read(path).await.map_err(|err| UploadError::File {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("application/pdf")
            .map_err(|err| UploadError::File {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        let form = Form::new().part("document", part);

        let response = self
            .client
            .post(format!("{}/upload-pdf", self.base_url))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|err| UploadError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let reply: UploadReply = response
            .json()
            .await
            .map_err(|err| UploadError::InvalidResponse(err.to_string()))?;

        let document = DocumentRef::new(reply.document_id, file_name);
        self.commit(&document).await?;
        tracing::debug!("bound document {} ({})", document.id, document.name);

        Ok(UploadedDocument {
            document,
            snippet: reply.snippet,
        })
    }

    // Id and name are two separate keys (the storage interface fixes
    // them); a crash between the two writes can leave them inconsistent
    // across a reload.
    async fn commit(&self, document: &DocumentRef) -> Result<(), PoliqError> {
        self.store.set(KEY_DOCUMENT_ID, &document.id).await?;
        self.store.set(KEY_DOCUMENT_NAME, &document.name).await?;
        *self.current.write().await = Some(document.clone());
        Ok(())
    }
}

#[derive(Deserialize)]
struct UploadReply {
    document_id: String,
    #[serde(default)]
    snippet: Option<String>,
}
