//! Verification harness.
//!
//! Runs a fixed, ordered battery of checks against a deployed service and turns
//! the results into a readiness verdict. The only short-circuit is the initial
//! service-up probe; after that every check runs regardless of earlier failures.

pub mod check;
pub mod checks;
pub mod harness;
pub mod report;

pub use check::{CheckError, CheckId, CheckResult, Outcome};
pub use checks::CheckContext;
pub use harness::{Harness, HarnessState, RunMode};
pub use report::RunReport;
