//! Storage abstraction trait
//!
//! This module defines the StorageClient trait and the closed error taxonomy shared
//! by the initializer and the endpoint prober.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// The five classes a storage failure can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageErrorKind {
    NotFound,
    AuthError,
    SignatureMismatch,
    BucketMissing,
    TransportError,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageErrorKind::NotFound => "NotFound",
            StorageErrorKind::AuthError => "AuthError",
            StorageErrorKind::SignatureMismatch => "SignatureMismatch",
            StorageErrorKind::BucketMissing => "BucketMissing",
            StorageErrorKind::TransportError => "TransportError",
        };
        f.write_str(name)
    }
}

/// Storage operation errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Access denied or invalid access key: {0}")]
    AuthError(String),

    #[error("Request signature does not match: {0}")]
    SignatureMismatch(String),

    #[error("Bucket does not exist: {0}")]
    BucketMissing(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    /// The client could not be built from the supplied settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn from_kind(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            StorageErrorKind::NotFound => StorageError::NotFound(message),
            StorageErrorKind::AuthError => StorageError::AuthError(message),
            StorageErrorKind::SignatureMismatch => StorageError::SignatureMismatch(message),
            StorageErrorKind::BucketMissing => StorageError::BucketMissing(message),
            StorageErrorKind::TransportError => StorageError::TransportError(message),
        }
    }

    /// Classified kind; `None` for client construction failures.
    pub fn kind(&self) -> Option<StorageErrorKind> {
        match self {
            StorageError::NotFound(_) => Some(StorageErrorKind::NotFound),
            StorageError::AuthError(_) => Some(StorageErrorKind::AuthError),
            StorageError::SignatureMismatch(_) => Some(StorageErrorKind::SignatureMismatch),
            StorageError::BucketMissing(_) => Some(StorageErrorKind::BucketMissing),
            StorageError::TransportError(_) => Some(StorageErrorKind::TransportError),
            StorageError::ConfigError(_) => None,
        }
    }

    /// Only transport failures are worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::TransportError(_))
    }

    /// Failures after which no further write may be attempted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StorageError::AuthError(_)
                | StorageError::SignatureMismatch(_)
                | StorageError::BucketMissing(_)
                | StorageError::ConfigError(_)
        )
    }

    /// Operator hint for the classified failure, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            StorageError::BucketMissing(_) => {
                Some("the bucket does not exist; create it in the provider console")
            }
            StorageError::AuthError(_) => Some("check the access key in your environment"),
            StorageError::SignatureMismatch(_) => {
                Some("check the secret key in your environment")
            }
            StorageError::TransportError(_) => {
                Some("the endpoint could not be reached; retry or check the endpoint URL")
            }
            StorageError::NotFound(_) | StorageError::ConfigError(_) => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One entry of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

impl ObjectSummary {
    /// Size rounded to whole kilobytes, as shown in bucket listings.
    pub fn size_kb(&self) -> u64 {
        (self.size + 512) / 1024
    }
}

/// Storage abstraction trait
///
/// Implementations are bound to a single bucket and credential set at construction
/// time. Keys are flat, `/`-separated and relative to the bucket root.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Whether an object exists at `key`. Absence is `Ok(false)`, never an error.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Fetch the full object body.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Write an object, replacing any existing one.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// List at most `max_keys` objects under `prefix` (the whole bucket when `None`),
    /// in key order.
    async fn list(&self, prefix: Option<&str>, max_keys: usize)
        -> StorageResult<Vec<ObjectSummary>>;

    /// Name of the bucket this client is bound to.
    fn bucket(&self) -> &str;
}
