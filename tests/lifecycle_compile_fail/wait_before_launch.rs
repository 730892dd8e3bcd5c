// This test should FAIL to compile
// Waiting on an execution that was never launched

use execbox::exec::context::ExecContext;
use execbox::exec::executor::ExecutorOptions;
use execbox::exec::lifecycle::Execution;

fn main() {
    let ctx = ExecContext::background();
    let execution = Execution::new(Vec::new(), ExecutorOptions::default());

    // This should fail: NotStarted has no wait method
    execution.wait(&ctx);
}
