//! Configuration error types.

/// Errors raised while resolving configuration, before any network call is made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    /// Names of the settings that caused the error.
    pub fn setting_names(&self) -> Vec<&'static str> {
        match self {
            ConfigError::Missing(names) => names.clone(),
            ConfigError::Invalid { name, .. } => vec![*name],
        }
    }
}
