//! VideosPlus Storage Library
//!
//! Thin client over an S3-compatible bucket: existence check, get, put and bounded
//! listing. Every transport failure is classified exactly once, at this boundary,
//! into a [`StorageErrorKind`]; callers above never inspect error text.
//!
//! # Key layout
//!
//! - `metadata/videosplus-data.json`: the canonical metadata document
//! - `<folder>/.keep`: zero-byte folder markers

pub(crate) mod classify;
pub mod factory;
pub mod object_store_client;
pub mod retry;
pub mod traits;

// Re-export commonly used types
pub use factory::{connect, S3Connector, StorageConnector, TransportOptions};
pub use object_store_client::ObjectStoreClient;
pub use retry::{RetryPolicy, RetryingClient};
pub use traits::{ObjectSummary, StorageClient, StorageError, StorageErrorKind, StorageResult};
