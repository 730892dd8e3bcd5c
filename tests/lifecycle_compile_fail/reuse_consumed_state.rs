// This test should FAIL to compile
// Launching the same execution twice

use execbox::exec::context::ExecContext;
use execbox::exec::executor::ExecutorOptions;
use execbox::exec::lifecycle::Execution;

fn main() {
    let ctx = ExecContext::background();
    let execution = Execution::new(Vec::new(), ExecutorOptions::default());

    // First transition consumes execution
    let _first = execution.launch(&ctx);

    // This should fail: execution was moved and can no longer be used
    let _second = execution.launch(&ctx);
}
