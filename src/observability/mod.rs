//! Observability
//!
//! Structured execution events for operational visibility.

pub mod audit;

pub use audit::{ExecutionEvent, ExecutionEventKind, ExecutionObserver, LogObserver, RecordingObserver};
