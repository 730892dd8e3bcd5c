//! Execution control
//!
//! Launches one child process per call, supervises it under a cancellable
//! context and guarantees the process is gone before returning.

pub mod context;
pub mod executor;
pub mod lifecycle;
