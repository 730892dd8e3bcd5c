use crate::judge::adapter::LanguageRuntime;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_PYTHON: &str = "python3";

/// Runs snippets with `python3 -c <code>`.
#[derive(Debug, Clone)]
pub struct PythonRuntime {
    interpreter: PathBuf,
}

impl Default for PythonRuntime {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON)
    }
}

impl PythonRuntime {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl LanguageRuntime for PythonRuntime {
    fn language(&self) -> &'static str {
        "python"
    }

    fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    fn run_command(&self, code: &str) -> Vec<OsString> {
        vec![
            self.interpreter.clone().into_os_string(),
            "-c".into(),
            code.into(),
        ]
    }
}
