/// Per-invocation lifecycle enforced with type-state
///
/// One execution moves through a fixed sequence and never re-enters a state:
/// 1. `NotStarted`: command resolved, nothing spawned
/// 2. `Launched`: child running as leader of its own process group
/// 3. `Finished`: child reaped (or the wait failed), evidence collected
/// 4. report: evidence classified into an `ExecutionOutcome`
///
/// Launch failure leaves `NotStarted` directly for a reported outcome.
/// Every transition consumes `self`.
use crate::core::types::ExecutionOutcome;
use crate::exec::context::ExecContext;
use crate::exec::executor::{self, ChildGuard, ExecutorOptions};
use crate::verdict::{OutcomeClassifier, WaitEvidence};
use std::ffi::OsString;
use std::process::Command;
use std::time::Instant;

pub struct NotStarted;

pub struct Launched {
    child: ChildGuard,
    started: Instant,
}

pub struct Finished {
    evidence: WaitEvidence,
}

pub struct Execution<S> {
    command: Vec<OsString>,
    options: ExecutorOptions,
    state: S,
}

impl<S> Execution<S> {
    /// Interpreter path for display; the command itself is never re-encoded
    pub fn interpreter(&self) -> String {
        self.command
            .first()
            .map(|program| program.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Execution<NotStarted> {
    pub fn new(command: Vec<OsString>, options: ExecutorOptions) -> Self {
        Self {
            command,
            options,
            state: NotStarted,
        }
    }

    /// Spawn the child unless the context is already done.
    ///
    /// The error side is already the final outcome; no wait happens on it.
    pub fn launch(self, ctx: &ExecContext) -> Result<Execution<Launched>, ExecutionOutcome> {
        if let Some(cause) = ctx.err() {
            return Err(OutcomeClassifier::classify_unlaunched(cause));
        }

        let Some((program, args)) = self.command.split_first() else {
            return Err(ExecutionOutcome::launch_failed(
                String::new(),
                "empty command".to_string(),
            ));
        };

        let mut cmd = Command::new(program);
        cmd.args(args);

        let started = Instant::now();
        let child = executor::spawn_process_group(&mut cmd, self.options.kill_grace)
            .map_err(|e| {
                ExecutionOutcome::launch_failed(program.to_string_lossy().into_owned(), e.to_string())
            })?;

        Ok(Execution {
            command: self.command,
            options: self.options,
            state: Launched { child, started },
        })
    }
}

impl Execution<Launched> {
    pub fn pid(&self) -> u32 {
        self.state.child.pid()
    }

    /// Block until the child ends or the context forces it down
    pub fn wait(self, ctx: &ExecContext) -> Execution<Finished> {
        let Launched { mut child, started } = self.state;
        let evidence = executor::supervise(&mut child, ctx, &self.options, started);

        // Dropping the guard kills any group members left behind.
        drop(child);

        Execution {
            command: self.command,
            options: self.options,
            state: Finished { evidence },
        }
    }
}

impl Execution<Finished> {
    pub fn report(self) -> ExecutionOutcome {
        OutcomeClassifier::classify(&self.state.evidence)
    }
}
