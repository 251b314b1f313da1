//! Idempotent creation of the canonical metadata document.

use bytes::Bytes;
use std::sync::Arc;
use videosplus_core::constants::{marker_key, MARKER_FOLDERS};
use videosplus_core::MetadataDocument;
use videosplus_storage::{StorageClient, StorageErrorKind};

use crate::error::BootstrapError;

const JSON_CONTENT_TYPE: &str = "application/json";
const MARKER_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerStatus {
    Created,
    AlreadyPresent,
    Failed(Option<StorageErrorKind>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOutcome {
    pub key: String,
    pub status: MarkerStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    /// Whether this call wrote the document. `false` means it was already there.
    pub created: bool,
    /// Folder marker results, empty when markers are disabled.
    pub markers: Vec<MarkerOutcome>,
}

/// Make sure a document exists at `canonical_key`.
///
/// The factory is only invoked when the key is absent, and at most one `put` is issued.
/// An existing document is never rewritten.
pub async fn ensure_initialized<F>(
    client: &dyn StorageClient,
    canonical_key: &str,
    factory: F,
) -> Result<bool, BootstrapError>
where
    F: FnOnce() -> MetadataDocument,
{
    if client.exists(canonical_key).await? {
        tracing::info!(
            bucket = %client.bucket(),
            key = %canonical_key,
            "Metadata document already present, nothing to write"
        );
        return Ok(false);
    }

    let document = factory();
    let body = document.to_json_bytes()?;
    client
        .put(canonical_key, Bytes::from(body), JSON_CONTENT_TYPE)
        .await?;

    tracing::info!(
        bucket = %client.bucket(),
        key = %canonical_key,
        users = document.users.len(),
        "Metadata document created"
    );
    Ok(true)
}

/// Write a zero-byte `.keep` object under every logical folder.
///
/// Best effort: failures are logged and reported per marker, never returned.
/// Markers that already exist are left alone.
pub async fn create_folder_markers(client: &dyn StorageClient) -> Vec<MarkerOutcome> {
    let mut outcomes = Vec::with_capacity(MARKER_FOLDERS.len());

    for folder in MARKER_FOLDERS {
        let key = marker_key(folder);
        let status = match client.exists(&key).await {
            Ok(true) => MarkerStatus::AlreadyPresent,
            Ok(false) => match client.put(&key, Bytes::new(), MARKER_CONTENT_TYPE).await {
                Ok(()) => MarkerStatus::Created,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to create folder marker");
                    MarkerStatus::Failed(e.kind())
                }
            },
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to check folder marker");
                MarkerStatus::Failed(e.kind())
            }
        };
        outcomes.push(MarkerOutcome { key, status });
    }

    outcomes
}

/// Bootstrap step bound to one storage client and canonical key.
pub struct Initializer {
    client: Arc<dyn StorageClient>,
    canonical_key: String,
    folder_markers: bool,
}

impl Initializer {
    pub fn new(client: Arc<dyn StorageClient>, canonical_key: impl Into<String>) -> Self {
        Self {
            client,
            canonical_key: canonical_key.into(),
            folder_markers: true,
        }
    }

    pub fn with_folder_markers(mut self, enabled: bool) -> Self {
        self.folder_markers = enabled;
        self
    }

    /// Ensure the document exists, then lay down folder markers.
    ///
    /// Markers are only attempted once the document step has succeeded; any error from
    /// that step is returned as is and nothing else is written.
    pub async fn run<F>(&self, factory: F) -> Result<InitOutcome, BootstrapError>
    where
        F: FnOnce() -> MetadataDocument,
    {
        let created = ensure_initialized(self.client.as_ref(), &self.canonical_key, factory)
            .await
            .map_err(|e| {
                tracing::error!(
                    key = %self.canonical_key,
                    error = %e,
                    fatal = e.is_fatal(),
                    "Bootstrap failed"
                );
                e
            })?;

        let markers = if self.folder_markers {
            create_folder_markers(self.client.as_ref()).await
        } else {
            Vec::new()
        };

        Ok(InitOutcome { created, markers })
    }
}
