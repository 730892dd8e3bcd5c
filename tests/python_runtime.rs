//! Python runtime scenarios
//!
//! Skipped when no `python3` is installed on the host.

mod common;

use common::python_available;
use execbox::config::types::InfraError;
use execbox::core::types::OutcomeKind;
use execbox::exec::context::ExecContext;
use execbox::exec::executor::ProcessExecutor;
use execbox::judge::languages::python::PythonRuntime;
use execbox::judge::LanguageRuntime;
use std::time::{Duration, Instant};

macro_rules! require_python {
    () => {
        if !python_available() {
            eprintln!("python3 not available, skipping");
            return;
        }
    };
}

#[test]
fn test_python_exit_code() {
    require_python!();
    let ctx = ExecContext::with_timeout(Duration::from_secs(10));
    let outcome = PythonRuntime::default().compile_and_run(
        &ctx,
        &ProcessExecutor::default(),
        "exit(7)",
    );
    assert_eq!(outcome.exit_codes(), (0, 7, None));
}

#[test]
fn test_python_uncaught_exception_is_nonzero_exit() {
    require_python!();
    let ctx = ExecContext::with_timeout(Duration::from_secs(10));
    let outcome = PythonRuntime::default().compile_and_run(
        &ctx,
        &ProcessExecutor::default(),
        "raise ValueError('boom')",
    );
    assert_eq!(outcome.kind, OutcomeKind::Exited { code: 1 });
}

#[test]
fn test_python_infinite_loop_times_out() {
    require_python!();
    let ctx = ExecContext::with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let outcome = PythonRuntime::default().compile_and_run(
        &ctx,
        &ProcessExecutor::default(),
        "while True: pass",
    );

    assert_eq!(outcome.kind, OutcomeKind::TimedOut);
    assert_eq!(
        outcome.exit_codes(),
        (-1, -1, Some(InfraError::DeadlineExceeded))
    );
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_python_missing_interpreter() {
    let ctx = ExecContext::with_timeout(Duration::from_secs(10));
    let outcome = PythonRuntime::new("/nonexistent/bin/python3").compile_and_run(
        &ctx,
        &ProcessExecutor::default(),
        "print('hi')",
    );

    assert_eq!(outcome.kind, OutcomeKind::LaunchFailed);
    assert!(matches!(
        outcome.exit_codes(),
        (-1, -1, Some(InfraError::LaunchFailure { .. }))
    ));
}
