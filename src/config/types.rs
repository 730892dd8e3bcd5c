/// Error taxonomy for execbox
///
/// Two layers live here. [`InfraError`] is part of an execution outcome: it
/// describes why a run could not be completed on the program's own terms.
/// [`ExecError`] is for failures outside the outcome model (bad configuration,
/// unknown language, I/O while locating files).
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Infrastructure-level failure attached to an execution outcome.
///
/// A non-zero exit of the user program is never an `InfraError`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfraError {
    /// The interpreter process could not be created.
    #[error("failed to launch {interpreter}: {reason}")]
    LaunchFailure { interpreter: String, reason: String },

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("execution cancelled")]
    Cancelled,

    /// Terminated by a signal the caller's context did not cause.
    #[error("process terminated by signal {signal}{}", core_suffix(.core_dumped))]
    Killed { signal: String, core_dumped: bool },

    #[error("failed to wait for process: {reason}")]
    WaitFailure { reason: String },
}

fn core_suffix(core_dumped: &bool) -> &'static str {
    if *core_dumped {
        " (core dumped)"
    } else {
        ""
    }
}

/// Crate-level error for operations outside a single execution outcome.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExecError>;
