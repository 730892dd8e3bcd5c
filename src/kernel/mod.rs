//! Kernel primitives
//!
//! Wait-status decoding, signal delivery and process-group lookups.

pub mod procfs;
pub mod signal;
