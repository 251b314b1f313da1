use crate::object_store_client::ObjectStoreClient;
use crate::retry::{RetryPolicy, RetryingClient};
use crate::traits::{StorageClient, StorageResult};
use std::sync::Arc;
use std::time::Duration;
use videosplus_core::{Settings, StorageCredentials};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Per-call timeouts and retry policy for storage clients.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl TransportOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let request_timeout = settings.request_timeout();
        Self {
            request_timeout,
            connect_timeout: request_timeout.min(Duration::from_secs(CONNECT_TIMEOUT_SECS)),
            retry: RetryPolicy::default()
                .with_max_retries(settings.storage_max_retries)
                .with_initial_delay(settings.retry_initial_delay()),
        }
    }
}

/// Create an S3 storage client with transport retries for the given credentials.
pub fn connect(
    creds: &StorageCredentials,
    transport: &TransportOptions,
) -> StorageResult<Arc<dyn StorageClient>> {
    let client = ObjectStoreClient::s3(creds, transport)?;
    tracing::debug!(
        bucket = %creds.bucket,
        region = %creds.region,
        endpoint = %creds.endpoint,
        access_key = %creds.keys.masked_access_key(),
        "Storage client created"
    );
    Ok(Arc::new(RetryingClient::new(client, transport.retry.clone())))
}

/// Builds a storage client bound to one set of credentials.
///
/// The endpoint prober builds one client per candidate through this trait.
pub trait StorageConnector: Send + Sync {
    fn connect(&self, creds: &StorageCredentials) -> StorageResult<Arc<dyn StorageClient>>;
}

/// Connector producing S3 clients.
#[derive(Debug, Clone, Default)]
pub struct S3Connector {
    transport: TransportOptions,
}

impl S3Connector {
    pub fn new(transport: TransportOptions) -> Self {
        Self { transport }
    }
}

impl StorageConnector for S3Connector {
    fn connect(&self, creds: &StorageCredentials) -> StorageResult<Arc<dyn StorageClient>> {
        connect(creds, &self.transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use videosplus_core::AccessKeys;

    #[test]
    fn transport_options_follow_settings() {
        let settings = Settings::from_lookup(|name| match name {
            "VIDEOSPLUS_REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
            "VIDEOSPLUS_STORAGE_MAX_RETRIES" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        let options = TransportOptions::from_settings(&settings);
        assert_eq!(options.request_timeout, Duration::from_secs(5));
        assert_eq!(options.connect_timeout, Duration::from_secs(5));
        assert_eq!(options.retry.max_retries, 1);
    }

    #[test]
    fn s3_client_builds_without_network() {
        let creds = StorageCredentials {
            keys: AccessKeys::new("AKIAEXAMPLE", "secret"),
            region: "us-east-1".to_string(),
            bucket: "videosplus".to_string(),
            endpoint: "http://localhost:9000".to_string(),
        };
        let client = S3Connector::default().connect(&creds).unwrap();
        assert_eq!(client.bucket(), "videosplus");
    }
}
