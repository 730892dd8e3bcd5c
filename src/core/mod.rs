//! Language-agnostic outcome model.
//!
//! Requests, terminations and classified outcomes shared by the executor,
//! the classifier and the language runtimes.

pub mod types;
