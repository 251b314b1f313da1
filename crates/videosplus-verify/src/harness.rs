//! Driver for a verification run.

use tracing::Instrument;
use uuid::Uuid;

use crate::check::{CheckId, CheckResult};
use crate::checks::CheckContext;
use crate::report::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    NotStarted,
    CheckingServerUp,
    RunningChecks,
    /// The service was not up; no check ran.
    Aborted,
    /// Every check of the run completed.
    Reported,
}

impl HarnessState {
    pub fn is_terminal(self) -> bool {
        matches!(self, HarnessState::Aborted | HarnessState::Reported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Full,
    Quick,
}

impl RunMode {
    pub fn checks(self) -> &'static [CheckId] {
        match self {
            RunMode::Full => &CheckId::FULL,
            RunMode::Quick => &CheckId::QUICK,
        }
    }
}

/// One verification run against one service.
///
/// Checks run sequentially in declaration order. A failing check is recorded and
/// the next one runs; only the initial service-up probe can stop the run.
pub struct Harness {
    context: CheckContext,
    mode: RunMode,
    run_id: Uuid,
    state: HarnessState,
}

impl Harness {
    pub fn new(context: CheckContext, mode: RunMode) -> Self {
        Self {
            context,
            mode,
            run_id: Uuid::new_v4(),
            state: HarnessState::NotStarted,
        }
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub async fn run(&mut self) -> RunReport {
        let span = tracing::info_span!(
            "verify",
            run_id = %self.run_id,
            mode = ?self.mode,
            base_url = %self.context.service.base_url()
        );
        self.drive().instrument(span).await
    }

    async fn drive(&mut self) -> RunReport {
        if self.state.is_terminal() {
            tracing::warn!(state = ?self.state, "Harness already finished, starting a new run");
            self.run_id = Uuid::new_v4();
        }

        self.state = HarnessState::CheckingServerUp;
        if let Err(e) = self.context.server_connection().await {
            self.state = HarnessState::Aborted;
            tracing::error!(error = %e, "Service is not up, no checks will run");
            return RunReport {
                run_id: self.run_id,
                mode: self.mode,
                state: self.state,
                abort_reason: Some(e.to_string()),
                results: Vec::new(),
            };
        }

        self.state = HarnessState::RunningChecks;
        let checks = self.mode.checks();
        let mut results = Vec::with_capacity(checks.len());
        for &id in checks {
            let result = match self.context.run(id).await {
                Ok(detail) => CheckResult::pass(id, detail),
                Err(e) => CheckResult::fail(id, e.to_string()),
            };

            if result.passed() {
                tracing::info!(check = id.label(), outcome = %result.outcome, "Check finished");
            } else {
                tracing::warn!(
                    check = id.label(),
                    outcome = %result.outcome,
                    message = result.message.as_deref().unwrap_or(""),
                    "Check finished"
                );
            }
            results.push(result);
        }

        self.state = HarnessState::Reported;
        let report = RunReport {
            run_id: self.run_id,
            mode: self.mode,
            state: self.state,
            abort_reason: None,
            results,
        };
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            ready = report.is_ready(),
            "Verification finished"
        );
        report
    }
}
