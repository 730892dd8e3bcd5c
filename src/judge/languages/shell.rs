use crate::judge::adapter::LanguageRuntime;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs snippets with `sh -c <code>`.
#[derive(Debug, Clone)]
pub struct ShellRuntime {
    interpreter: PathBuf,
}

impl Default for ShellRuntime {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellRuntime {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl LanguageRuntime for ShellRuntime {
    fn language(&self) -> &'static str {
        "sh"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_command_line() {
        assert_eq!(
            ShellRuntime::default().run_command("exit 3"),
            vec!["/bin/sh", "-c", "exit 3"]
        );
    }
}
