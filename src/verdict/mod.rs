//! Outcome classification
//!
//! Derives outcomes as pure functions over immutable wait evidence.

pub mod verdict;

pub use verdict::{OutcomeClassifier, WaitEvidence};
