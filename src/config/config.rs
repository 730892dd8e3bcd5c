/// Runtime configuration loading from execbox.json
use crate::config::types::{ExecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "execbox.json";

/// Interpreter settings for one language identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Interpreter binary, resolved through PATH when not absolute
    pub interpreter: PathBuf,
}

/// Full execbox.json structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Deadline applied when the caller does not give one
    pub default_timeout_ms: u64,
    /// Time between SIGTERM and SIGKILL when tearing a process group down
    pub kill_grace_ms: u64,
    /// Supervision poll interval while the child runs
    pub poll_interval_ms: u64,
    pub languages: HashMap<String, LanguageConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let mut languages = HashMap::new();
        languages.insert(
            "python".to_string(),
            LanguageConfig {
                interpreter: PathBuf::from("python3"),
            },
        );
        languages.insert(
            "sh".to_string(),
            LanguageConfig {
                interpreter: PathBuf::from("/bin/sh"),
            },
        );

        Self {
            default_timeout_ms: 10_000,
            kill_grace_ms: 50,
            poll_interval_ms: 10,
            languages,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_content = std::fs::read_to_string(path)
            .map_err(|e| ExecError::Config(format!("Failed to read config file: {}", e)))?;

        let config: RuntimeConfig = serde_json::from_str(&config_content)
            .map_err(|e| ExecError::Config(format!("Failed to parse config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load ./execbox.json, or built-in defaults when it does not exist
    pub fn load_default() -> Result<Self> {
        let config_path = std::env::current_dir()?.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            log::debug!(
                "{} not found, using built-in runtime defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(ExecError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        for (language, entry) in &self.languages {
            if entry.interpreter.as_os_str().is_empty() {
                return Err(ExecError::Config(format!(
                    "interpreter for language '{}' is empty",
                    language
                )));
            }
        }

        Ok(())
    }

    /// Interpreter configured for a language, if any
    pub fn interpreter_for(&self, language: &str) -> Option<&Path> {
        self.languages
            .get(language)
            .map(|entry| entry.interpreter.as_path())
    }

    /// Override (or add) the interpreter for a language
    pub fn set_interpreter(&mut self, language: &str, interpreter: impl Into<PathBuf>) {
        self.languages.insert(
            language.to_string(),
            LanguageConfig {
                interpreter: interpreter.into(),
            },
        );
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
