use crate::core::types::ExecutionOutcome;
use crate::exec::context::ExecContext;
use crate::exec::executor::ProcessExecutor;
use std::ffi::OsString;
use std::path::Path;

/// Execution strategy for one interpreter.
///
/// Implementations are stateless; one value may serve concurrent calls.
pub trait LanguageRuntime: Send + Sync {
    fn language(&self) -> &'static str;

    /// Interpreter binary this runtime launches
    fn interpreter(&self) -> &Path;

    /// Full argv for running `code` as a literal program
    fn run_command(&self, code: &str) -> Vec<OsString>;

    /// Run `code` to completion under `ctx` and classify the result
    fn compile_and_run(
        &self,
        ctx: &ExecContext,
        executor: &ProcessExecutor,
        code: &str,
    ) -> ExecutionOutcome {
        executor.run(ctx, self.language(), self.run_command(code))
    }
}
