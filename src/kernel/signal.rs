/// Signal plumbing for execbox
///
/// Covers the places the executor touches signals: decoding the wait status
/// of a finished child, delivering termination signals to a child's process
/// group, and the async-safe shutdown flag used by the CLI.
use crate::core::types::Termination;
use crate::kernel::procfs;
use log::{debug, info};
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Global shutdown flag (async-safe atomic)
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Decode a wait status into how the process ended.
///
/// Returns `None` for states that are not terminal (still alive, stopped,
/// continued); the caller keeps waiting in that case.
pub fn decode_wait_status(status: WaitStatus) -> Option<Termination> {
    match status {
        WaitStatus::Exited(_, code) => Some(Termination::Exited { code }),
        WaitStatus::Signaled(_, sig, core_dumped) => Some(Termination::Signaled {
            signal: sig as i32,
            core_dumped,
        }),
        _ => None,
    }
}

/// Symbolic name for a raw signal number, e.g. `SIGKILL`
pub fn signal_name(signal: i32) -> String {
    match Signal::try_from(signal) {
        Ok(sig) => sig.as_str().to_string(),
        Err(_) => format!("signal {}", signal),
    }
}

/// Deliver `sig` to the process group led by `pid`.
///
/// Falls back to the leader alone when the group cannot be signalled.
/// Returns false when neither the group nor the leader exists any more.
pub fn signal_process_group(pid: Pid, sig: Signal) -> bool {
    match signal::killpg(pid, sig) {
        Ok(()) => true,
        Err(group_err) => match signal::kill(pid, sig) {
            Ok(()) => {
                debug!(
                    "group {} fallback used for pid {}: {}",
                    sig.as_str(),
                    pid,
                    group_err
                );
                true
            }
            Err(_) => false,
        },
    }
}

/// SIGKILL every live member of `pgid` and wait up to `grace` for them to die.
///
/// The group leader must still be unreaped (a zombie at most) so that `pgid`
/// cannot be reused while this runs. Zombies count as dead. Returns false if
/// live members remained when the wait gave up.
pub fn kill_process_group(pgid: Pid, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;

    loop {
        let live = procfs::live_group_members(pgid);
        if live.is_empty() {
            return true;
        }

        // Re-sent on every round so members forked meanwhile are caught too.
        let _ = signal::killpg(pgid, Signal::SIGKILL);
        debug!("killed {} leftover members of process group {}", live.len(), pgid);

        if Instant::now() >= deadline {
            return procfs::live_group_members(pgid).is_empty();
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Signal handler state
pub struct SignalHandler;

impl SignalHandler {
    /// Initialize signal handlers
    /// Must be called early in main() before any threads are spawned
    pub fn init() -> Result<Self, String> {
        Self::install_signal_handlers()?;

        Ok(Self)
    }

    /// Install signal handlers for SIGINT, SIGTERM
    fn install_signal_handlers() -> Result<(), String> {
        let sig_action = SigAction::new(
            SigHandler::Handler(Self::signal_handler),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );

        unsafe {
            signal::sigaction(Signal::SIGINT, &sig_action)
                .map_err(|e| format!("Failed to install SIGINT handler: {}", e))?;

            signal::sigaction(Signal::SIGTERM, &sig_action)
                .map_err(|e| format!("Failed to install SIGTERM handler: {}", e))?;
        }

        info!("Signal handlers installed (SIGINT, SIGTERM)");
        Ok(())
    }

    /// Async-safe signal handler
    /// Only performs atomic operations - no allocations, no locks, no I/O
    extern "C" fn signal_handler(_signal: libc::c_int) {
        SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
    }
}

/// Returns false once SIGINT or SIGTERM was received
pub fn should_continue() -> bool {
    !SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_normal_exit() {
        let status = WaitStatus::Exited(Pid::from_raw(42), 7);
        assert_eq!(
            decode_wait_status(status),
            Some(Termination::Exited { code: 7 })
        );
    }

    #[test]
    fn decodes_signal_termination() {
        let status = WaitStatus::Signaled(Pid::from_raw(42), Signal::SIGKILL, false);
        assert_eq!(
            decode_wait_status(status),
            Some(Termination::Signaled {
                signal: libc::SIGKILL,
                core_dumped: false,
            })
        );
    }

    #[test]
    fn non_terminal_states_keep_waiting() {
        assert_eq!(decode_wait_status(WaitStatus::StillAlive), None);
        assert_eq!(
            decode_wait_status(WaitStatus::Stopped(Pid::from_raw(42), Signal::SIGSTOP)),
            None
        );
        assert_eq!(
            decode_wait_status(WaitStatus::Continued(Pid::from_raw(42))),
            None
        );
    }

    #[test]
    fn signal_names() {
        assert_eq!(signal_name(libc::SIGTERM), "SIGTERM");
        assert_eq!(signal_name(libc::SIGKILL), "SIGKILL");
        assert_eq!(signal_name(9999), "signal 9999");
    }

    #[test]
    fn missing_group_has_nothing_to_kill() {
        // PIDs near i32::MAX are never allocated on Linux defaults.
        let pid = Pid::from_raw(i32::MAX - 7);
        assert!(!signal_process_group(pid, Signal::SIGTERM));
        assert!(kill_process_group(pid, Duration::ZERO));
    }

    #[test]
    fn test_signal_handler_init() {
        let handler = SignalHandler::init();
        assert!(handler.is_ok());
    }
}
