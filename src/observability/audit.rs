/// Execution event reporting for execbox
///
/// The executor reports lifecycle events to an injected [`ExecutionObserver`].
/// Events are advisory: nothing in classification reads them back.
use crate::core::types::{ExecutionOutcome, OutcomeKind};
use crate::config::types::InfraError;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use uuid::Uuid;

pub const LOG_TARGET: &str = "execbox::exec";

/// Correlation identifiers for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationIds {
    pub run_id: String,
    pub language: String,
    /// Interpreter pid, once launched
    pub pid: Option<u32>,
}

impl CorrelationIds {
    pub fn new(language: &str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            language: language.to_string(),
            pid: None,
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEventKind {
    /// Process spawned, about to be waited on
    Launching { interpreter: String },
    LaunchFailed { reason: String },
    ExitedNonZero { code: i32 },
    TimedOut,
    Cancelled,
    Terminated { signal: String },
    WaitFailed { reason: String },
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub correlation: CorrelationIds,
    pub kind: ExecutionEventKind,
    pub timestamp: SystemTime,
}

impl ExecutionEvent {
    pub fn new(correlation: &CorrelationIds, kind: ExecutionEventKind) -> Self {
        Self {
            correlation: correlation.clone(),
            kind,
            timestamp: SystemTime::now(),
        }
    }

    /// Terminal event describing a classified outcome
    pub fn for_outcome(correlation: &CorrelationIds, outcome: &ExecutionOutcome) -> Self {
        let kind = match (&outcome.kind, &outcome.infra_error) {
            (OutcomeKind::Exited { code: 0 }, _) => ExecutionEventKind::Completed,
            (OutcomeKind::Exited { code }, _) => ExecutionEventKind::ExitedNonZero { code: *code },
            (OutcomeKind::TimedOut, _) => ExecutionEventKind::TimedOut,
            (OutcomeKind::Cancelled, _) => ExecutionEventKind::Cancelled,
            (OutcomeKind::Killed { .. }, Some(InfraError::Killed { signal, .. })) => {
                ExecutionEventKind::Terminated {
                    signal: signal.clone(),
                }
            }
            (OutcomeKind::Killed { signal }, _) => ExecutionEventKind::Terminated {
                signal: signal.to_string(),
            },
            (OutcomeKind::LaunchFailed, err) => ExecutionEventKind::LaunchFailed {
                reason: err.as_ref().map(ToString::to_string).unwrap_or_default(),
            },
            (OutcomeKind::WaitFailed, err) => ExecutionEventKind::WaitFailed {
                reason: err.as_ref().map(ToString::to_string).unwrap_or_default(),
            },
        };

        Self::new(correlation, kind)
    }
}

/// Sink for execution events, injected by the caller
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Default observer writing through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ExecutionObserver for LogObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        let ids = &event.correlation;
        let pid = ids.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());

        match &event.kind {
            ExecutionEventKind::Launching { interpreter } => info!(
                target: LOG_TARGET,
                "running program: run_id={} language={} pid={} interpreter={}",
                ids.run_id, ids.language, pid, interpreter
            ),
            ExecutionEventKind::LaunchFailed { reason } => error!(
                target: LOG_TARGET,
                "program failed to launch: run_id={} language={} error={}",
                ids.run_id, ids.language, reason
            ),
            ExecutionEventKind::ExitedNonZero { code } => info!(
                target: LOG_TARGET,
                "program exited with non-zero exit code: run_id={} pid={} code={}",
                ids.run_id, pid, code
            ),
            ExecutionEventKind::TimedOut => info!(
                target: LOG_TARGET,
                "program timed out: run_id={} pid={} error=deadline exceeded",
                ids.run_id, pid
            ),
            ExecutionEventKind::Cancelled => info!(
                target: LOG_TARGET,
                "program cancelled: run_id={} pid={}",
                ids.run_id, pid
            ),
            ExecutionEventKind::Terminated { signal } => error!(
                target: LOG_TARGET,
                "program was terminated: run_id={} pid={} signal={}",
                ids.run_id, pid, signal
            ),
            ExecutionEventKind::WaitFailed { reason } => warn!(
                target: LOG_TARGET,
                "program failed to run: run_id={} pid={} error={}",
                ids.run_id, pid, reason
            ),
            ExecutionEventKind::Completed => info!(
                target: LOG_TARGET,
                "program ran successfully: run_id={} pid={}",
                ids.run_id, pid
            ),
        }
    }
}

/// Observer that keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ExecutionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<ExecutionEventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }

    /// Pid reported by the launch event, if it has happened yet
    pub fn launched_pid(&self) -> Option<u32> {
        self.events()
            .iter()
            .find(|e| matches!(e.kind, ExecutionEventKind::Launching { .. }))
            .and_then(|e| e.correlation.pid)
    }
}

impl ExecutionObserver for RecordingObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_correlation_ids_creation() {
        let ids = CorrelationIds::new("python");
        assert_eq!(ids.language, "python");
        assert!(ids.pid.is_none());
        assert!(!ids.run_id.is_empty());
        assert_ne!(ids.run_id, CorrelationIds::new("python").run_id);
    }

    #[test]
    fn test_correlation_ids_with_pid() {
        let ids = CorrelationIds::new("sh").with_pid(1234);
        assert_eq!(ids.pid, Some(1234));
    }

    #[test]
    fn test_outcome_events() {
        let ids = CorrelationIds::new("sh").with_pid(10);
        let cases = [
            (
                ExecutionOutcome::exited(0, 10, Duration::ZERO),
                ExecutionEventKind::Completed,
            ),
            (
                ExecutionOutcome::exited(7, 10, Duration::ZERO),
                ExecutionEventKind::ExitedNonZero { code: 7 },
            ),
            (
                ExecutionOutcome::timed_out(Some(10), Duration::ZERO),
                ExecutionEventKind::TimedOut,
            ),
            (
                ExecutionOutcome::killed(libc::SIGKILL, "SIGKILL".into(), false, 10, Duration::ZERO),
                ExecutionEventKind::Terminated {
                    signal: "SIGKILL".into(),
                },
            ),
        ];

        for (outcome, expected) in cases {
            assert_eq!(ExecutionEvent::for_outcome(&ids, &outcome).kind, expected);
        }
    }

    #[test]
    fn test_launch_failure_event_carries_reason() {
        let ids = CorrelationIds::new("python");
        let outcome = ExecutionOutcome::launch_failed("/nope".into(), "not found".into());
        match ExecutionEvent::for_outcome(&ids, &outcome).kind {
            ExecutionEventKind::LaunchFailed { reason } => assert!(reason.contains("/nope")),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_recording_observer() {
        let observer = RecordingObserver::new();
        let ids = CorrelationIds::new("sh").with_pid(77);
        observer.on_event(&ExecutionEvent::new(
            &ids,
            ExecutionEventKind::Launching {
                interpreter: "/bin/sh".into(),
            },
        ));
        observer.on_event(&ExecutionEvent::new(&ids, ExecutionEventKind::Completed));

        assert_eq!(observer.events().len(), 2);
        assert_eq!(observer.launched_pid(), Some(77));
        assert_eq!(observer.kinds()[1], ExecutionEventKind::Completed);
    }

    #[test]
    fn test_log_observer_accepts_every_event() {
        let ids = CorrelationIds::new("sh");
        for kind in [
            ExecutionEventKind::TimedOut,
            ExecutionEventKind::Cancelled,
            ExecutionEventKind::WaitFailed {
                reason: "ECHILD".into(),
            },
        ] {
            LogObserver.on_event(&ExecutionEvent::new(&ids, kind));
        }
    }

    #[test]
    fn test_event_serialization() {
        let ids = CorrelationIds::new("python");
        let event = ExecutionEvent::new(&ids, ExecutionEventKind::ExitedNonZero { code: 2 });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["event"], "exited_non_zero");
        assert_eq!(json["kind"]["code"], 2);
    }
}
