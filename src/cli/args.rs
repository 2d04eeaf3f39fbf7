//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use clap::Parser;

use super::{resolve_install_dir, resolve_settings_path, LaunchProfile};
use crate::lib::errors::LaunchError;

/// Parsed command intent from CLI.
#[derive(Debug, Clone)]
pub enum ParsedCommand {
    /// Load the env file and replace this process with the target.
    Launch(LaunchProfile),
    /// Validate everything up to the exec and print a report.
    Check(LaunchProfile),
}

/// Command-line arguments. With none given, the launcher behaves exactly like
/// the wrapper it replaces.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run-mail",
    version,
    about = "Load the sibling .gmail_env and exec the mail sender script",
    long_about = None,
    after_help = "Relative --env-file, --target and --interpreter paths are resolved against the launcher directory."
)]
pub struct LaunchArgs {
    /// Directory holding the env file and target (overrides RUN_MAIL_DIR; defaults to the executable's real directory).
    #[arg(long = "dir", value_name = "DIR")]
    pub dir_override: Option<PathBuf>,
    /// Path to a launcher.toml (defaults to launcher.toml next to the executable, if present).
    #[arg(long = "settings", value_name = "PATH")]
    pub settings_override: Option<PathBuf>,
    /// Env file to load instead of .gmail_env.
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,
    /// Program to run instead of send_mail_test_v3.py.
    #[arg(long, value_name = "PATH")]
    pub target: Option<PathBuf>,
    /// Interpreter name on PATH or path to it (default: python3).
    #[arg(long, value_name = "BIN")]
    pub interpreter: Option<String>,
    /// Skip malformed env file lines with a warning instead of aborting.
    #[arg(long, default_value_t = false)]
    pub lenient: bool,
    /// Validate the launch and print a JSON report instead of executing.
    #[arg(long, default_value_t = false)]
    pub check: bool,
    /// Log launch decisions to stderr.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl LaunchArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile, LaunchError> {
        let (install_dir, dir_source) = resolve_install_dir(self.dir_override)?;
        let settings_path = resolve_settings_path(self.settings_override)?;

        Ok(LaunchProfile {
            install_dir,
            dir_source,
            settings_path,
            env_file: self.env_file,
            target: self.target,
            interpreter: self.interpreter.filter(|name| !name.trim().is_empty()),
            lenient: self.lenient,
        })
    }

    /// Parse CLI args into either launch mode or check mode.
    pub fn into_command(self) -> Result<ParsedCommand, LaunchError> {
        let check = self.check;
        let profile = self.build()?;
        tracing::info!(
            target: "run_mail::cli",
            install_dir = %profile.install_dir.display(),
            dir_source = profile.dir_source.as_str(),
            check,
            "Resolved launch profile"
        );
        Ok(if check {
            ParsedCommand::Check(profile)
        } else {
            ParsedCommand::Launch(profile)
        })
    }
}
