//! VideosPlus Core Library
//!
//! Domain models, configuration and error types shared by the storage,
//! bootstrap, verification and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{
    AccessKeys, FieldValidation, Settings, StorageCredentials, StorageField, StorageSettings,
};
pub use error::ConfigError;
pub use models::{
    BootstrapDefaults, MetadataDocument, Session, SiteConfig, StorageConfigRecord, User, Video,
};
