use std::fmt;
use uuid::Uuid;

use crate::check::CheckResult;
use crate::harness::{HarnessState, RunMode};

/// Final outcome of a harness run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub mode: RunMode,
    /// Either [`HarnessState::Aborted`] or [`HarnessState::Reported`].
    pub state: HarnessState,
    pub abort_reason: Option<String>,
    /// Results in the order the checks ran.
    pub results: Vec<CheckResult>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    pub fn is_aborted(&self) -> bool {
        self.state == HarnessState::Aborted
    }

    /// Ready iff every check ran and none failed.
    pub fn is_ready(&self) -> bool {
        self.state == HarnessState::Reported && self.failed() == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            RunMode::Full => "full",
            RunMode::Quick => "quick",
        };

        if let Some(reason) = &self.abort_reason {
            writeln!(f, "Verification aborted ({} run {}):", mode, self.run_id)?;
            writeln!(f, "  service is not up: {}", reason)?;
            writeln!(f, "  start the service and run the verification again")?;
            return write!(f, "Verdict: NOT READY");
        }

        writeln!(f, "Results ({} run {}):", mode, self.run_id)?;
        for result in &self.results {
            match &result.message {
                Some(message) => writeln!(f, "  {}  {}: {}", result.outcome, result.name(), message)?,
                None => writeln!(f, "  {}  {}", result.outcome, result.name())?,
            }
        }

        writeln!(f)?;
        writeln!(f, "Passed: {}/{}", self.passed(), self.total())?;
        if self.failed() > 0 {
            writeln!(f, "Failed: {}/{}", self.failed(), self.total())?;
            writeln!(f, "Problems found:")?;
            for failure in self.failures() {
                writeln!(
                    f,
                    "  - {}: {}",
                    failure.name(),
                    failure.message.as_deref().unwrap_or("failed")
                )?;
            }
        }

        if self.is_ready() {
            write!(f, "Verdict: READY")
        } else {
            write!(f, "Verdict: NOT READY (fix the problems above before deploying)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckId;

    fn report(results: Vec<CheckResult>) -> RunReport {
        RunReport {
            run_id: Uuid::nil(),
            mode: RunMode::Full,
            state: HarnessState::Reported,
            abort_reason: None,
            results,
        }
    }

    #[test]
    fn tally_and_verdict() {
        let r = report(vec![
            CheckResult::pass(CheckId::VideosApi, None),
            CheckResult::fail(CheckId::UsersApi, "administrator record is missing"),
        ]);
        assert_eq!((r.passed(), r.failed()), (1, 1));
        assert!(!r.is_ready());

        let text = r.to_string();
        assert!(text.contains("Failed: 1/2"));
        assert!(text.contains("  - API de Usuários: administrator record is missing"));
        assert!(text.ends_with("NOT READY (fix the problems above before deploying)"));
    }

    #[test]
    fn all_passing_is_ready() {
        let r = report(vec![CheckResult::pass(CheckId::Environment, None)]);
        assert!(r.is_ready());
        assert!(r.to_string().ends_with("Verdict: READY"));
        assert!(!r.to_string().contains("Problems found"));
    }

    #[test]
    fn aborted_run_is_never_ready() {
        let r = RunReport {
            state: HarnessState::Aborted,
            abort_reason: Some("connection refused".into()),
            ..report(Vec::new())
        };
        assert!(!r.is_ready());
        assert!(r.is_aborted());
        assert!(r.to_string().contains("service is not up: connection refused"));
    }
}
