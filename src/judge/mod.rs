//! Language runtimes.
//!
//! The executor stays language-agnostic. Runtimes define how a snippet is
//! turned into an interpreter command line for each language.

pub mod adapter;
pub mod languages;
pub mod registry;

pub use adapter::LanguageRuntime;
pub use registry::runtime_for;
