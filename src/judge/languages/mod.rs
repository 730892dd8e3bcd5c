pub mod python;
pub mod shell;
