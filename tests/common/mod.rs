//! Shared helpers for the execution integration tests

#![allow(dead_code)]

use execbox::exec::executor::{ExecutorOptions, ProcessExecutor};
use execbox::observability::audit::RecordingObserver;
use std::process::Command;
use std::sync::Arc;

pub fn recording_executor() -> (ProcessExecutor, RecordingObserver) {
    let observer = RecordingObserver::new();
    let executor = ProcessExecutor::new(ExecutorOptions::default(), Arc::new(observer.clone()));
    (executor, observer)
}

/// True when `python3` can be started on this host
pub fn python_available() -> bool {
    Command::new("python3")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// True if `pid` still names a live (non-zombie) process.
///
/// Orphans reparented to a non-reaping init linger as zombies, which
/// count as gone here.
pub fn process_alive(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => match stat.rfind(')') {
            Some(end) => !stat[end + 1..].trim_start().starts_with(['Z', 'X']),
            None => false,
        },
        Err(_) => false,
    }
}
