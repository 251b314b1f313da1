use crate::classify::classify;
use crate::factory::TransportOptions;
use crate::traits::{
    ObjectSummary, StorageClient, StorageError, StorageErrorKind, StorageResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    RetryConfig,
};
use std::sync::Arc;
use std::time::Instant;
use videosplus_core::StorageCredentials;

/// Storage client backed by any `object_store` implementation: Amazon S3 compatible
/// endpoints in production, [`InMemory`] in tests.
#[derive(Clone)]
pub struct ObjectStoreClient {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    endpoint: Option<String>,
}

impl std::fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreClient")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ObjectStoreClient {
    /// Create a client for an S3-compatible endpoint.
    ///
    /// Requests use path-style addressing (`{endpoint}/{bucket}/{key}`), which every
    /// S3-compatible provider accepts. The store's built-in retry is disabled:
    /// retries are the job of [`crate::RetryingClient`], which only retries
    /// transport failures.
    pub fn s3(creds: &StorageCredentials, transport: &TransportOptions) -> StorageResult<Self> {
        let endpoint = creds.endpoint.trim_end_matches('/').to_string();
        let allow_http = endpoint.starts_with("http://");

        // allow_http lives in the client options; setting it on the builder would be
        // overwritten by `with_client_options`.
        let client_options = ClientOptions::new()
            .with_allow_http(allow_http)
            .with_timeout(transport.request_timeout)
            .with_connect_timeout(transport.connect_timeout);

        let store = AmazonS3Builder::new()
            .with_access_key_id(creds.keys.access_key.clone())
            .with_secret_access_key(creds.keys.secret_key.clone())
            .with_region(creds.region.clone())
            .with_bucket_name(creds.bucket.clone())
            .with_endpoint(endpoint.clone())
            .with_virtual_hosted_style_request(false)
            .with_client_options(client_options)
            .with_retry(RetryConfig {
                max_retries: 0,
                ..Default::default()
            })
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: creds.bucket.clone(),
            endpoint: Some(endpoint),
        })
    }

    /// Create a client over an empty in-process store.
    pub fn in_memory(bucket: impl Into<String>) -> Self {
        Self::from_store(Arc::new(InMemory::new()), bucket)
    }

    /// Wrap an existing store.
    pub fn from_store(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            endpoint: None,
        }
    }

    fn fail(
        &self,
        operation: &str,
        key: &str,
        err: object_store::Error,
        start: Instant,
    ) -> StorageError {
        let kind = classify(&err);
        tracing::error!(
            error = %err,
            kind = %kind,
            bucket = %self.bucket,
            key = %key,
            operation = operation,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage request failed"
        );
        StorageError::from_kind(kind, format!("{} {}/{}: {}", operation, self.bucket, key, err))
    }
}

#[async_trait]
impl StorageClient for ObjectStoreClient {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let start = Instant::now();
        let location = Path::from(key);

        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(e) if classify(&e) == StorageErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.fail("head", key, e, start)),
        }
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let start = Instant::now();
        let location = Path::from(key);

        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| self.fail("get", key, e, start))?;
        let bytes = result
            .bytes()
            .await
            .map_err(|e| self.fail("get", key, e, start))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage get successful"
        );

        Ok(bytes)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        let start = Instant::now();
        let size = data.len() as u64;
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| self.fail("put", key, e, start))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage put successful"
        );

        Ok(())
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<Vec<ObjectSummary>> {
        let start = Instant::now();
        let label = prefix.unwrap_or("");

        // object_store matches whole path segments, S3 matches raw key prefixes:
        // list the enclosing folder and filter on the full prefix.
        let parent = label.rfind('/').map(|i| &label[..i]).unwrap_or("");
        let parent_path = (!parent.is_empty()).then(|| Path::from(parent));

        let mut stream = self.store.list(parent_path.as_ref());
        let mut objects = Vec::new();
        while objects.len() < max_keys {
            match stream.next().await {
                Some(Ok(meta)) => {
                    let key = meta.location.to_string();
                    if key.starts_with(label) {
                        objects.push(ObjectSummary {
                            key,
                            size: meta.size as u64,
                            last_modified: meta.last_modified,
                        });
                    }
                }
                Some(Err(e)) => return Err(self.fail("list", label, e, start)),
                None => break,
            }
        }

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %label,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage list successful"
        );

        Ok(objects)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
