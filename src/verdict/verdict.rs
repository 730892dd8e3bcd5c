/// Outcome classification
/// Derives the outcome as a pure function over the evidence collected by the
/// executor once the wait has completed: outcome = f(evidence)
use crate::core::types::{ExecutionOutcome, KillReport, Termination};
use crate::exec::context::ContextError;
use crate::kernel::signal::signal_name;
use std::time::Duration;

/// Everything the executor knows after the wait step.
#[derive(Clone, Debug)]
pub struct WaitEvidence {
    pub pid: u32,
    /// Terminal status, or the error the wait itself failed with
    pub wait_result: Result<Termination, String>,
    /// Context state sampled when the wait result was produced
    pub context_error: Option<ContextError>,
    /// Context state that made the executor tear the process down, if it did
    pub enforced_by: Option<ContextError>,
    pub kill_report: Option<KillReport>,
    pub wall_time: Duration,
}

/// Outcome classifier - pure function over wait evidence
pub struct OutcomeClassifier;

impl OutcomeClassifier {
    /// Classify a finished execution.
    ///
    /// Precedence: enforced termination, normal exit, signal death attributed
    /// to the context, signal death not attributed to it, wait failure.
    pub fn classify(evidence: &WaitEvidence) -> ExecutionOutcome {
        // An enforced kill decides the outcome even when a child that traps
        // SIGTERM reports a normal exit (e.g. 143).
        if let Some(cause) = evidence.enforced_by {
            if evidence
                .kill_report
                .as_ref()
                .map(KillReport::any_sent)
                .unwrap_or(false)
            {
                return Self::classify_context(cause, Some(evidence.pid), evidence.wall_time);
            }
        }

        match &evidence.wait_result {
            Ok(Termination::Exited { code }) => {
                ExecutionOutcome::exited(*code, evidence.pid, evidence.wall_time)
            }
            Ok(Termination::Signaled {
                signal,
                core_dumped,
            }) => match evidence.context_error {
                Some(cause) => Self::classify_context(cause, Some(evidence.pid), evidence.wall_time),
                None => ExecutionOutcome::killed(
                    *signal,
                    signal_name(*signal),
                    *core_dumped,
                    evidence.pid,
                    evidence.wall_time,
                ),
            },
            Err(reason) => {
                ExecutionOutcome::wait_failed(reason.clone(), evidence.pid, evidence.wall_time)
            }
        }
    }

    /// Outcome for a context that was already done before launch
    pub fn classify_unlaunched(cause: ContextError) -> ExecutionOutcome {
        Self::classify_context(cause, None, Duration::ZERO)
    }

    fn classify_context(
        cause: ContextError,
        pid: Option<u32>,
        wall_time: Duration,
    ) -> ExecutionOutcome {
        match cause {
            ContextError::DeadlineExceeded => ExecutionOutcome::timed_out(pid, wall_time),
            ContextError::Cancelled => ExecutionOutcome::cancelled(pid, wall_time),
        }
    }
}
