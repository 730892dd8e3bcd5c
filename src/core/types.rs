use crate::config::types::InfraError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source code plus the language that should run it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub language: String,
    pub source: String,
}

impl ExecutionRequest {
    pub fn new(language: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            source: source.into(),
        }
    }
}

/// How a child process ended, as reported by the kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Termination {
    Exited { code: i32 },
    Signaled { signal: i32, core_dumped: bool },
}

/// Signal escalation report for enforced termination paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillReport {
    pub term_sent: bool,
    pub kill_sent: bool,
    pub waited_ms: u64,
}

impl KillReport {
    pub fn any_sent(&self) -> bool {
        self.term_sent || self.kill_sent
    }
}

/// Whether the interpreter process could be started.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LaunchStatus {
    Started,
    /// The context was already done, so no process was spawned
    NotStarted,
    Failed { reason: String },
}

/// The single classification of one execution attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Terminated normally; `code` may be zero or not
    Exited { code: i32 },
    TimedOut,
    Cancelled,
    Killed { signal: i32 },
    LaunchFailed,
    WaitFailed,
}

/// Classified result of one execution attempt.
///
/// Built only through the constructors below so that `launch_status`,
/// `program_exit_code` and `infra_error` always agree with `kind`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub kind: OutcomeKind,
    pub launch_status: LaunchStatus,
    pub program_exit_code: Option<i32>,
    pub infra_error: Option<InfraError>,
    /// Host pid of the interpreter, when one was started
    pub pid: Option<u32>,
    #[serde(with = "duration_ms")]
    pub wall_time: Duration,
}

impl ExecutionOutcome {
    pub fn exited(code: i32, pid: u32, wall_time: Duration) -> Self {
        Self {
            kind: OutcomeKind::Exited { code },
            launch_status: LaunchStatus::Started,
            program_exit_code: Some(code),
            infra_error: None,
            pid: Some(pid),
            wall_time,
        }
    }

    pub fn timed_out(pid: Option<u32>, wall_time: Duration) -> Self {
        Self {
            kind: OutcomeKind::TimedOut,
            launch_status: Self::launch_status_for(pid),
            program_exit_code: None,
            infra_error: Some(InfraError::DeadlineExceeded),
            pid,
            wall_time,
        }
    }

    pub fn cancelled(pid: Option<u32>, wall_time: Duration) -> Self {
        Self {
            kind: OutcomeKind::Cancelled,
            launch_status: Self::launch_status_for(pid),
            program_exit_code: None,
            infra_error: Some(InfraError::Cancelled),
            pid,
            wall_time,
        }
    }

    pub fn killed(
        signal: i32,
        signal_name: String,
        core_dumped: bool,
        pid: u32,
        wall_time: Duration,
    ) -> Self {
        Self {
            kind: OutcomeKind::Killed { signal },
            launch_status: LaunchStatus::Started,
            program_exit_code: None,
            infra_error: Some(InfraError::Killed {
                signal: signal_name,
                core_dumped,
            }),
            pid: Some(pid),
            wall_time,
        }
    }

    pub fn launch_failed(interpreter: String, reason: String) -> Self {
        Self {
            kind: OutcomeKind::LaunchFailed,
            launch_status: LaunchStatus::Failed {
                reason: reason.clone(),
            },
            program_exit_code: None,
            infra_error: Some(InfraError::LaunchFailure {
                interpreter,
                reason,
            }),
            pid: None,
            wall_time: Duration::ZERO,
        }
    }

    pub fn wait_failed(reason: String, pid: u32, wall_time: Duration) -> Self {
        Self {
            kind: OutcomeKind::WaitFailed,
            launch_status: LaunchStatus::Started,
            program_exit_code: None,
            infra_error: Some(InfraError::WaitFailure { reason }),
            pid: Some(pid),
            wall_time,
        }
    }

    fn launch_status_for(pid: Option<u32>) -> LaunchStatus {
        if pid.is_some() {
            LaunchStatus::Started
        } else {
            LaunchStatus::NotStarted
        }
    }

    /// True only for a clean exit with status 0
    pub fn success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Exited { code: 0 })
    }

    /// Two-integer form: `(launch_exit_code, program_exit_code, error)`.
    ///
    /// `-1` marks a code with no meaning for this outcome.
    pub fn exit_codes(&self) -> (i32, i32, Option<InfraError>) {
        match self.kind {
            OutcomeKind::Exited { code } => (0, code, None),
            OutcomeKind::WaitFailed => (0, -1, self.infra_error.clone()),
            OutcomeKind::TimedOut
            | OutcomeKind::Cancelled
            | OutcomeKind::Killed { .. }
            | OutcomeKind::LaunchFailed => (-1, -1, self.infra_error.clone()),
        }
    }

    /// Text suitable for the end user who submitted the code
    pub fn user_message(&self) -> String {
        match (&self.kind, &self.infra_error) {
            (OutcomeKind::Exited { code }, _) => {
                format!("your program exited with code {}", code)
            }
            (_, Some(err)) => format!("execution could not be completed: {}", err),
            (_, None) => "execution could not be completed".to_string(),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
