//! Bootstrap side of the toolkit: guaranteeing the canonical metadata document
//! exists in the bucket, and discovering which storage endpoint accepts a given
//! credential set.

pub mod error;
pub mod init;
pub mod probe;

pub use error::BootstrapError;
pub use init::{
    create_folder_markers, ensure_initialized, InitOutcome, Initializer, MarkerOutcome,
    MarkerStatus,
};
pub use probe::{default_candidates, EndpointCandidate, ProbeReport, ProbeResult, Prober};
