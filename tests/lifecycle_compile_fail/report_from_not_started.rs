// This test should FAIL to compile
// Reporting an outcome without launching anything

use execbox::exec::executor::ExecutorOptions;
use execbox::exec::lifecycle::Execution;

fn main() {
    let execution = Execution::new(Vec::new(), ExecutorOptions::default());

    // This should fail: NotStarted has no report method
    execution.report();
}
