pub mod commands;

use videosplus_bootstrap::EndpointCandidate;
use videosplus_storage::{ObjectSummary, StorageError};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// `.env` lines that point the tooling at `candidate`.
pub fn dotenv_lines(candidate: &EndpointCandidate, bucket: &str) -> String {
    format!(
        "WASABI_REGION={}\nWASABI_BUCKET={}\nWASABI_ENDPOINT={}",
        candidate.region, bucket, candidate.endpoint
    )
}

/// One line of a bucket listing, size in whole kilobytes.
pub fn format_object_line(object: &ObjectSummary) -> String {
    format!("{} ({} KB)", object.key, object.size_kb())
}

/// Wrap a storage failure with its operator hint, if it has one.
pub fn storage_failure(what: &str, err: StorageError) -> anyhow::Error {
    let context = match err.hint() {
        Some(hint) => format!("{}: {}", what, hint),
        None => what.to_string(),
    };
    anyhow::Error::new(err).context(context)
}
