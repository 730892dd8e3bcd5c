//! execbox: run a source snippet in an external interpreter under a deadline
//!
//! Every call launches exactly one child process, waits for it while watching
//! a cancellable context, and classifies what happened into one outcome:
//! clean exit, non-zero exit, timeout, cancellation, abnormal termination,
//! launch failure or wait failure.
//!
//! # Architecture
//!
//! ## Execution Control ([`exec`])
//! - [`exec::context`]: cancellable deadline context
//! - [`exec::lifecycle`]: type-state per-invocation state machine
//! - [`exec::executor`]: launch, supervised wait and process-group cleanup
//!
//! ## Kernel Primitives ([`kernel`])
//! - [`kernel::signal`]: wait-status decoding and signal delivery
//!
//! ## Outcome ([`crate::core`], [`verdict`])
//! - [`crate::core::types`]: outcome data model
//! - [`verdict::verdict`]: pure classification over wait evidence
//!
//! ## Language Runtimes ([`judge`])
//! - [`judge::adapter`]: the `LanguageRuntime` strategy trait
//! - [`judge::registry`]: language identifier to runtime mapping
//!
//! ## Observability ([`observability`])
//! - [`observability::audit`]: injected execution event observers
//!
//! ## Configuration ([`config`])
//! - [`config::config`]: runtime configuration loading
//! - [`config::types`]: error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use execbox::exec::context::ExecContext;
//! use execbox::exec::executor::ProcessExecutor;
//! use execbox::judge::languages::python::PythonRuntime;
//! use execbox::judge::LanguageRuntime;
//! use std::time::Duration;
//!
//! let ctx = ExecContext::with_timeout(Duration::from_secs(5));
//! let outcome = PythonRuntime::default().compile_and_run(
//!     &ctx,
//!     &ProcessExecutor::default(),
//!     "exit(7)",
//! );
//! assert_eq!(outcome.exit_codes(), (0, 7, None));
//! ```

// Execution Control
pub mod exec;

// Kernel Primitives
pub mod kernel;

// Outcome model
pub mod core;

// Classification
pub mod verdict;

// Language runtimes
pub mod judge;

// Observability
pub mod observability;

// Configuration & errors
pub mod config;

// CLI entrypoint wiring for the execbox binary.
pub mod cli;

pub use crate::config::config::RuntimeConfig;
pub use crate::config::types::{ExecError, InfraError, Result};
pub use crate::core::types::{ExecutionOutcome, ExecutionRequest, LaunchStatus, OutcomeKind};
pub use crate::exec::context::{CancelHandle, ContextError, ExecContext};
pub use crate::exec::executor::{ExecutorOptions, ProcessExecutor};
pub use crate::judge::{runtime_for, LanguageRuntime};

/// Resolve the request's language and run it under `ctx`.
///
/// Unknown languages are a configuration error; every other failure is part
/// of the returned outcome.
pub fn execute(
    ctx: &ExecContext,
    executor: &ProcessExecutor,
    config: &RuntimeConfig,
    request: &ExecutionRequest,
) -> Result<ExecutionOutcome> {
    let runtime = runtime_for(&request.language, config)?;
    Ok(runtime.compile_and_run(ctx, executor, &request.source))
}
