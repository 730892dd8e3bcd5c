use crate::config::config::RuntimeConfig;
use crate::config::types::{ExecError, Result};
use crate::judge::adapter::LanguageRuntime;
use crate::judge::languages::{python::PythonRuntime, shell::ShellRuntime};

/// Language identifiers accepted by [`runtime_for`]
pub const SUPPORTED_LANGUAGES: &[&str] = &["python", "sh"];

/// Canonical language name for an identifier or alias
pub fn canonical_language(language: &str) -> Option<&'static str> {
    match language {
        "python" | "py" | "python3" => Some("python"),
        "sh" | "shell" => Some("sh"),
        _ => None,
    }
}

pub fn runtime_for(language: &str, config: &RuntimeConfig) -> Result<Box<dyn LanguageRuntime>> {
    match canonical_language(language) {
        Some("python") => Ok(Box::new(match config.interpreter_for("python") {
            Some(path) => PythonRuntime::new(path),
            None => PythonRuntime::default(),
        })),
        Some("sh") => Ok(Box::new(match config.interpreter_for("sh") {
            Some(path) => ShellRuntime::new(path),
            None => ShellRuntime::default(),
        })),
        _ => Err(ExecError::Config(format!(
            "unsupported language runtime: {language}"
        ))),
    }
}
