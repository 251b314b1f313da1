//! Retry decorator for storage clients.
//!
//! Retries only [`StorageError::TransportError`] with exponential backoff; every other
//! kind is returned on the first occurrence. Retrying never changes what is written,
//! so the initializer's existence check still precedes its single write.

use crate::traits::{ObjectSummary, StorageClient, StorageError, StorageResult};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use bytes::Bytes;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub factor: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that performs the initial attempt only.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    fn build_backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay.max(self.initial_delay))
            .with_max_times(self.max_retries as usize)
            .with_factor(self.factor)
            .with_jitter()
    }
}

/// Wraps a client and retries its transport failures.
#[derive(Debug, Clone)]
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: StorageClient> RetryingClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn run<T, F, Fut>(&self, operation: &'static str, key: &str, call: F) -> StorageResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StorageResult<T>>,
    {
        let max_retries = self.policy.max_retries;
        let bucket = self.inner.bucket();
        let mut attempt = 0u32;

        call.retry(self.policy.build_backoff())
            .when(StorageError::is_transient)
            .notify(|err: &StorageError, delay: Duration| {
                attempt += 1;
                warn!(
                    operation = operation,
                    bucket = %bucket,
                    key = %key,
                    attempt = attempt,
                    max_retries = max_retries,
                    next_delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Storage request failed, will retry"
                );
            })
            .await
    }
}

#[async_trait]
impl<C: StorageClient> StorageClient for RetryingClient<C> {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.run("exists", key, || self.inner.exists(key)).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.run("get", key, || self.inner.get(key)).await
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.run("put", key, || self.inner.put(key, data.clone(), content_type))
            .await
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<Vec<ObjectSummary>> {
        self.run("list", prefix.unwrap_or(""), || self.inner.list(prefix, max_keys))
            .await
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the given error a fixed number of times, then succeeds.
    struct Flaky {
        failures: u32,
        error: StorageError,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32, error: StorageError) -> Self {
            Self {
                failures,
                error,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl StorageClient for Flaky {
        async fn exists(&self, _key: &str) -> StorageResult<bool> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok(true)
            }
        }

        async fn get(&self, _key: &str) -> StorageResult<Bytes> {
            unimplemented!()
        }

        async fn put(&self, _key: &str, _data: Bytes, _content_type: &str) -> StorageResult<()> {
            unimplemented!()
        }

        async fn list(
            &self,
            _prefix: Option<&str>,
            _max_keys: usize,
        ) -> StorageResult<Vec<ObjectSummary>> {
            unimplemented!()
        }

        fn bucket(&self) -> &str {
            "flaky"
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(max_retries)
            .with_initial_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn transport_errors_are_retried_until_success() {
        let client = RetryingClient::new(
            Flaky::new(2, StorageError::TransportError("reset".into())),
            fast_policy(3),
        );
        assert!(client.exists("k").await.unwrap());
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let client = RetryingClient::new(
            Flaky::new(10, StorageError::TransportError("reset".into())),
            fast_policy(2),
        );
        let err = client.exists("k").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn classified_failures_are_not_retried() {
        let client = RetryingClient::new(
            Flaky::new(1, StorageError::BucketMissing("videosplus".into())),
            fast_policy(3),
        );
        let err = client.exists("k").await.unwrap_err();
        assert!(matches!(err, StorageError::BucketMissing(_)));
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 1);
    }
}
