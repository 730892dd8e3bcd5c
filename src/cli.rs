use crate::config::config::RuntimeConfig;
use crate::core::types::{ExecutionOutcome, ExecutionRequest, OutcomeKind};
use crate::exec::context::ExecContext;
use crate::exec::executor::{ExecutorOptions, ProcessExecutor};
use crate::judge::registry::{canonical_language, runtime_for, SUPPORTED_LANGUAGES};
use crate::kernel::signal::SignalHandler;
use crate::observability::audit::LogObserver;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Exit status used when the deadline expired (matches coreutils `timeout`)
pub const EXIT_TIMEOUT: i32 = 124;
/// Exit status for infrastructure failures other than timeout and cancel
pub const EXIT_INFRA: i32 = 125;
/// Exit status after SIGINT/SIGTERM cancelled the run
pub const EXIT_CANCELLED: i32 = 130;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Runtime configuration file (defaults to ./execbox.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a snippet with the interpreter for a language
    ///
    /// Exits with the program's own exit code when it ran to an exit, otherwise
    /// with 124 (timeout), 130 (cancelled) or 125 (any other failure). A program
    /// can exit with those codes itself; use --json when the cases must be told
    /// apart.
    Run {
        /// Language identifier (python, sh)
        #[arg(long)]
        language: String,
        /// Source code as string
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        code: Option<String>,
        /// Read the source code from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Interpreter binary overriding the configured one
        #[arg(long)]
        interpreter: Option<PathBuf>,
        /// Print the outcome as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Check that configured interpreters can be launched
    CheckDeps {
        /// Show interpreter version output
        #[arg(long)]
        verbose: bool,
    },
}

/// Parse arguments, run the command and return the process exit status
pub fn run() -> Result<i32> {
    env_logger::init();

    if let Err(e) = SignalHandler::init() {
        log::warn!("signal handlers unavailable, Ctrl-C will not cancel runs: {}", e);
    }

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            language,
            code,
            file,
            timeout_ms,
            interpreter,
            json,
        } => {
            let source = match (code, file) {
                (Some(code), _) => code,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read source file {}", path.display()))?,
                (None, None) => anyhow::bail!("either --code or --file is required"),
            };

            let mut config = config;
            if let Some(interpreter) = interpreter {
                let canonical = canonical_language(&language)
                    .ok_or_else(|| anyhow::anyhow!("unsupported language runtime: {}", language))?;
                config.set_interpreter(canonical, interpreter);
            }

            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.default_timeout());
            let ctx = ExecContext::with_timeout(timeout).follow_shutdown();
            let executor =
                ProcessExecutor::new(ExecutorOptions::from_config(&config), Arc::new(LogObserver));

            let request = ExecutionRequest::new(language, source);
            let outcome = crate::execute(&ctx, &executor, &config, &request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                eprintln!("{}", outcome.user_message());
            }

            Ok(exit_status_for(&outcome))
        }
        Commands::CheckDeps { verbose } => check_language_dependencies(&config, verbose),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<RuntimeConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::load_from_file(path)?,
        None => RuntimeConfig::load_default()?,
    };
    Ok(config)
}

/// Map an outcome onto the CLI's own exit status.
///
/// Not injective: `Exited { code: 124 }` and `TimedOut` both map to 124. The
/// JSON output carries the outcome kind.
pub fn exit_status_for(outcome: &ExecutionOutcome) -> i32 {
    match outcome.kind {
        OutcomeKind::Exited { code } => code,
        OutcomeKind::TimedOut => EXIT_TIMEOUT,
        OutcomeKind::Cancelled => EXIT_CANCELLED,
        OutcomeKind::Killed { .. } | OutcomeKind::LaunchFailed | OutcomeKind::WaitFailed => {
            EXIT_INFRA
        }
    }
}

/// Check if every supported language has a launchable interpreter
fn check_language_dependencies(config: &RuntimeConfig, verbose: bool) -> Result<i32> {
    use std::process::Command;

    println!("🔍 Checking language dependencies...");
    println!();

    let mut missing_languages = Vec::new();

    for language in SUPPORTED_LANGUAGES {
        let runtime = runtime_for(language, config)?;
        let interpreter = runtime.interpreter();

        match Command::new(interpreter).arg("--version").output() {
            Ok(output) => {
                let version_info = if !output.stdout.is_empty() {
                    String::from_utf8_lossy(&output.stdout)
                } else {
                    String::from_utf8_lossy(&output.stderr)
                }
                .lines()
                .next()
                .unwrap_or("")
                .to_string();

                println!("✅ {} - OK", language);
                if verbose {
                    println!("  {} -> {}", interpreter.display(), version_info.trim());
                }
            }
            Err(e) => {
                println!("❌ {} - MISSING", language);
                if verbose {
                    println!("  {} -> {}", interpreter.display(), e);
                }
                missing_languages.push(*language);
            }
        }
    }

    println!();

    if missing_languages.is_empty() {
        println!("🎉 All language interpreters are available!");
        Ok(0)
    } else {
        println!(
            "❌ Missing language interpreters: {}",
            missing_languages.join(", ")
        );
        println!("Set an interpreter path in execbox.json or pass --interpreter to run.");
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_requires_code_or_file() {
        assert!(Cli::try_parse_from(["execbox", "run", "--language", "python"]).is_err());
        assert!(Cli::try_parse_from([
            "execbox", "run", "--language", "python", "--code", "pass", "--file", "x.py"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["execbox", "run", "--language", "sh", "--code", "exit 1"]).is_ok());
    }

    #[test]
    fn exit_status_mapping() {
        let exited = ExecutionOutcome::exited(42, 1, Duration::ZERO);
        assert_eq!(exit_status_for(&exited), 42);

        let timeout = ExecutionOutcome::timed_out(Some(1), Duration::ZERO);
        assert_eq!(exit_status_for(&timeout), EXIT_TIMEOUT);

        let cancelled = ExecutionOutcome::cancelled(None, Duration::ZERO);
        assert_eq!(exit_status_for(&cancelled), EXIT_CANCELLED);

        let launch = ExecutionOutcome::launch_failed("x".into(), "y".into());
        assert_eq!(exit_status_for(&launch), EXIT_INFRA);
    }

    #[test]
    fn program_exit_124_is_distinguishable_in_json() {
        let program = ExecutionOutcome::exited(EXIT_TIMEOUT, 1, Duration::ZERO);
        let timeout = ExecutionOutcome::timed_out(Some(1), Duration::ZERO);
        assert_eq!(exit_status_for(&program), exit_status_for(&timeout));

        let program = serde_json::to_value(&program).unwrap();
        let timeout = serde_json::to_value(&timeout).unwrap();
        assert_eq!(program["kind"]["outcome"], "exited");
        assert_eq!(timeout["kind"]["outcome"], "timed_out");
    }

    #[test]
    fn run_help_points_to_json_for_status_collisions() {
        let command = Cli::command();
        let run = command.find_subcommand("run").unwrap();
        let help = run.get_long_about().unwrap().to_string();
        assert!(help.contains("--json"));
        assert!(help.contains("124"));
    }
}
