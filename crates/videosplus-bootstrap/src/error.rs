use videosplus_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize metadata document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("None of the {attempted} candidate endpoints is reachable")]
    NoReachableEndpoint { attempted: usize },

    #[error("Invalid endpoint candidate '{0}': expected region=https://endpoint")]
    InvalidCandidate(String),
}

impl BootstrapError {
    /// Whether the run must stop without attempting any further writes.
    pub fn is_fatal(&self) -> bool {
        match self {
            BootstrapError::Storage(e) => e.is_fatal(),
            BootstrapError::Serialize(_)
            | BootstrapError::NoReachableEndpoint { .. }
            | BootstrapError::InvalidCandidate(_) => true,
        }
    }
}
