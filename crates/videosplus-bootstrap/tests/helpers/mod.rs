#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use videosplus_core::StorageCredentials;
use videosplus_storage::{
    ObjectStoreClient, ObjectSummary, StorageClient, StorageConnector, StorageError,
    StorageErrorKind, StorageResult,
};

/// In-memory client that records every write attempt and can fail puts under a prefix.
pub struct RecordingClient {
    inner: ObjectStoreClient,
    put_attempts: Mutex<Vec<String>>,
    failing_prefix: Option<(String, StorageErrorKind)>,
    exists_error: Option<StorageErrorKind>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            inner: ObjectStoreClient::in_memory("test-bucket"),
            put_attempts: Mutex::new(Vec::new()),
            failing_prefix: None,
            exists_error: None,
        }
    }

    pub fn failing_puts(mut self, prefix: &str, kind: StorageErrorKind) -> Self {
        self.failing_prefix = Some((prefix.to_string(), kind));
        self
    }

    pub fn failing_exists(mut self, kind: StorageErrorKind) -> Self {
        self.exists_error = Some(kind);
        self
    }

    pub fn put_attempts(&self) -> Vec<String> {
        self.put_attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageClient for RecordingClient {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        if let Some(kind) = self.exists_error {
            return Err(StorageError::from_kind(kind, key));
        }
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.put_attempts.lock().unwrap().push(key.to_string());
        if let Some((prefix, kind)) = &self.failing_prefix {
            if key.starts_with(prefix.as_str()) {
                return Err(StorageError::from_kind(*kind, key));
            }
        }
        self.inner.put(key, data, content_type).await
    }

    async fn list(&self, prefix: Option<&str>, max_keys: usize) -> StorageResult<Vec<ObjectSummary>> {
        self.inner.list(prefix, max_keys).await
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }
}

/// Client whose every call fails with one kind.
pub struct UnreachableClient {
    kind: StorageErrorKind,
    bucket: String,
}

#[async_trait]
impl StorageClient for UnreachableClient {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Err(StorageError::from_kind(self.kind, key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        Err(StorageError::from_kind(self.kind, key))
    }

    async fn put(&self, key: &str, _data: Bytes, _content_type: &str) -> StorageResult<()> {
        Err(StorageError::from_kind(self.kind, key))
    }

    async fn list(&self, _prefix: Option<&str>, _max_keys: usize) -> StorageResult<Vec<ObjectSummary>> {
        Err(StorageError::from_kind(self.kind, "list"))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Connector that answers per endpoint: reachable unless a failure kind is scripted.
#[derive(Default)]
pub struct ScriptedConnector {
    failures: HashMap<String, StorageErrorKind>,
    broken: Vec<String>,
    connected: Mutex<Vec<StorageCredentials>>,
}

impl ScriptedConnector {
    pub fn failing(mut self, endpoint: &str, kind: StorageErrorKind) -> Self {
        self.failures.insert(endpoint.to_string(), kind);
        self
    }

    /// Client construction itself fails for this endpoint.
    pub fn broken(mut self, endpoint: &str) -> Self {
        self.broken.push(endpoint.to_string());
        self
    }

    pub fn connected(&self) -> Vec<StorageCredentials> {
        self.connected.lock().unwrap().clone()
    }
}

impl StorageConnector for ScriptedConnector {
    fn connect(&self, creds: &StorageCredentials) -> StorageResult<Arc<dyn StorageClient>> {
        self.connected.lock().unwrap().push(creds.clone());
        if self.broken.contains(&creds.endpoint) {
            return Err(StorageError::ConfigError(format!("bad endpoint {}", creds.endpoint)));
        }
        match self.failures.get(&creds.endpoint) {
            Some(kind) => Ok(Arc::new(UnreachableClient {
                kind: *kind,
                bucket: creds.bucket.clone(),
            })),
            None => Ok(Arc::new(ObjectStoreClient::in_memory(creds.bucket.clone()))),
        }
    }
}
