// This test should FAIL to compile
// Reporting an outcome while the child is still running

use execbox::exec::context::ExecContext;
use execbox::exec::executor::ExecutorOptions;
use execbox::exec::lifecycle::Execution;

fn main() {
    let ctx = ExecContext::background();
    let execution = Execution::new(Vec::new(), ExecutorOptions::default());

    if let Ok(launched) = execution.launch(&ctx) {
        // This should fail: Launched has no report method
        launched.report();
    }
}
