/// Process execution and supervision with guaranteed cleanup
use crate::config::config::RuntimeConfig;
use crate::core::types::{ExecutionOutcome, KillReport, Termination};
use crate::exec::context::ExecContext;
use crate::exec::lifecycle::Execution;
use crate::kernel::signal::{self, decode_wait_status};
use crate::observability::audit::{
    CorrelationIds, ExecutionEvent, ExecutionEventKind, ExecutionObserver, LogObserver,
};
use crate::verdict::WaitEvidence;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitid, waitpid, Id, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::ffi::OsString;
use std::os::unix::process::CommandExt;
use std::process::Command;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Supervision timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorOptions {
    pub poll_interval: Duration,
    pub kill_grace: Duration,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

impl ExecutorOptions {
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            poll_interval: config.poll_interval().max(Duration::from_millis(1)),
            kill_grace: config.kill_grace(),
        }
    }
}

/// Owns a launched child process group.
///
/// The leader is never reaped before the rest of its group is dead: its exit
/// is only observed (`WNOWAIT`), so the zombie keeps the group id reserved
/// while the members are killed. Whatever path drops the guard, the group is
/// SIGKILLed, drained and the leader reaped.
pub struct ChildGuard {
    pid: Pid,
    grace: Duration,
    exited: bool,
}

impl ChildGuard {
    pub fn pid(&self) -> u32 {
        self.pid.as_raw() as u32
    }

    fn mark_exited(&mut self) {
        self.exited = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.exited {
            signal::signal_process_group(self.pid, Signal::SIGKILL);
            let _ = blocking_observe(self.pid);
        }

        // The leader's pid doubles as the group id.
        if !signal::kill_process_group(self.pid, self.grace) {
            log::warn!(
                "process group {} still has live members after {:?}",
                self.pid,
                self.grace
            );
        }

        reap(self.pid);
    }
}

/// Spawn `cmd` as leader of a new process group, inheriting stdio.
///
/// `grace` bounds how long the guard waits for leftover members to die.
pub fn spawn_process_group(cmd: &mut Command, grace: Duration) -> std::io::Result<ChildGuard> {
    let child = cmd.process_group(0).spawn()?;

    // The std handle is dropped without waiting; reaping goes through waitpid.
    let pid = Pid::from_raw(child.id() as i32);
    drop(child);

    Ok(ChildGuard {
        pid,
        grace,
        exited: false,
    })
}

/// Wait for the child while watching the context.
///
/// Polls `waitid(WNOHANG)`; once the context is done the group is torn down
/// and the tear-down is recorded as enforced. The leader is left unreaped.
pub fn supervise(
    child: &mut ChildGuard,
    ctx: &ExecContext,
    options: &ExecutorOptions,
    started: Instant,
) -> WaitEvidence {
    let pid = child.pid;

    loop {
        match observe_exit(pid, false) {
            Ok(WaitStatus::StillAlive) => {
                if let Some(cause) = ctx.err() {
                    let (kill_report, wait_result) = terminate_process_group(pid, options);
                    if wait_result.is_ok() {
                        child.mark_exited();
                    }
                    return WaitEvidence {
                        pid: child.pid(),
                        wait_result,
                        context_error: Some(cause),
                        enforced_by: Some(cause),
                        kill_report: Some(kill_report),
                        wall_time: started.elapsed(),
                    };
                }
                std::thread::sleep(next_poll(ctx, options));
            }
            Ok(status) => match decode_wait_status(status) {
                Some(termination) => {
                    child.mark_exited();
                    return WaitEvidence {
                        pid: child.pid(),
                        wait_result: Ok(termination),
                        context_error: ctx.err(),
                        enforced_by: None,
                        kill_report: None,
                        wall_time: started.elapsed(),
                    };
                }
                None => std::thread::sleep(next_poll(ctx, options)),
            },
            Err(Errno::EINTR) => continue,
            Err(e) => {
                return WaitEvidence {
                    pid: child.pid(),
                    wait_result: Err(format!("waitid: {}", e)),
                    context_error: ctx.err(),
                    enforced_by: None,
                    kill_report: None,
                    wall_time: started.elapsed(),
                };
            }
        }
    }
}

fn next_poll(ctx: &ExecContext, options: &ExecutorOptions) -> Duration {
    match ctx.remaining() {
        Some(remaining) => remaining.min(options.poll_interval),
        None => options.poll_interval,
    }
}

/// SIGTERM the group, give it `kill_grace` to exit, then SIGKILL.
///
/// Returns once the leader's exit is observed; reaping is left to the guard.
fn terminate_process_group(
    pid: Pid,
    options: &ExecutorOptions,
) -> (KillReport, Result<Termination, String>) {
    let mut report = KillReport::default();
    let start = Instant::now();

    report.term_sent = signal::signal_process_group(pid, Signal::SIGTERM);

    let grace_deadline = start + options.kill_grace;
    while Instant::now() < grace_deadline {
        match observe_exit(pid, false) {
            Ok(WaitStatus::StillAlive) | Err(Errno::EINTR) => {}
            Ok(status) => {
                if let Some(termination) = decode_wait_status(status) {
                    report.waited_ms = start.elapsed().as_millis() as u64;
                    return (report, Ok(termination));
                }
            }
            Err(e) => {
                report.waited_ms = start.elapsed().as_millis() as u64;
                return (report, Err(format!("waitid: {}", e)));
            }
        }
        std::thread::sleep(options.poll_interval.min(Duration::from_millis(5)));
    }

    report.kill_sent = signal::signal_process_group(pid, Signal::SIGKILL);
    let wait_result = blocking_observe(pid);
    report.waited_ms = start.elapsed().as_millis() as u64;

    (report, wait_result)
}

/// `waitid(WEXITED | WNOWAIT)` on the leader: reports its exit status but
/// leaves it a zombie.
fn observe_exit(pid: Pid, block: bool) -> nix::Result<WaitStatus> {
    let mut flags = WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT;
    if !block {
        flags |= WaitPidFlag::WNOHANG;
    }
    waitid(Id::Pid(pid), flags)
}

/// Block until the leader has a terminal status, retrying on EINTR
fn blocking_observe(pid: Pid) -> Result<Termination, String> {
    loop {
        match observe_exit(pid, true) {
            Ok(status) => {
                if let Some(termination) = decode_wait_status(status) {
                    return Ok(termination);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(format!("waitid: {}", e)),
        }
    }
}

/// Release the leader's zombie. Only called once its exit was observed.
fn reap(pid: Pid) {
    loop {
        match waitpid(pid, None) {
            Err(Errno::EINTR) => continue,
            Ok(_) => return,
            Err(e) => {
                log::debug!("reaping {} failed: {}", pid, e);
                return;
            }
        }
    }
}

/// Runs commands to completion under a context, reporting to an observer
pub struct ProcessExecutor {
    options: ExecutorOptions,
    observer: Arc<dyn ExecutionObserver>,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(ExecutorOptions::default(), Arc::new(LogObserver))
    }
}

impl ProcessExecutor {
    pub fn new(options: ExecutorOptions, observer: Arc<dyn ExecutionObserver>) -> Self {
        Self { options, observer }
    }

    /// Launch `command`, wait for it and classify the result.
    ///
    /// Never spawns more than one process and never returns while that
    /// process (or its group) is still running.
    pub fn run(&self, ctx: &ExecContext, language: &str, command: Vec<OsString>) -> ExecutionOutcome {
        let mut ids = CorrelationIds::new(language);

        let launched = match Execution::new(command, self.options).launch(ctx) {
            Ok(launched) => launched,
            Err(outcome) => {
                self.observer
                    .on_event(&ExecutionEvent::for_outcome(&ids, &outcome));
                return outcome;
            }
        };

        ids = ids.with_pid(launched.pid());
        self.observer.on_event(&ExecutionEvent::new(
            &ids,
            ExecutionEventKind::Launching {
                interpreter: launched.interpreter(),
            },
        ));

        let outcome = launched.wait(ctx).report();
        self.observer
            .on_event(&ExecutionEvent::for_outcome(&ids, &outcome));
        outcome
    }
}
