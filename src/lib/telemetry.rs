//! Telemetry initialization and launch event helpers.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter; keeps the success path silent.
const DEFAULT_DIRECTIVE: &str = "warn";
/// Filter applied by `--verbose` when `RUST_LOG` is unset.
const VERBOSE_DIRECTIVE: &str = "info";

/// Initialize `tracing` with logs on stderr, leaving stdout to the target program.
pub fn init_tracing(verbose: bool) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// What is about to be executed. Never carries variable values.
#[derive(Debug)]
pub struct LaunchTelemetry<'a> {
    pub install_dir: &'a str,
    pub env_file: &'a str,
    pub target: &'a str,
    pub interpreter: &'a str,
    pub variable_names: &'a [String],
    pub skipped_lines: usize,
}

/// Emit the launch plan to `tracing` right before control is handed over.
pub fn emit_launch(telemetry: &LaunchTelemetry<'_>) {
    info!(
        target: "run_mail::runtime",
        install_dir = telemetry.install_dir,
        env_file = telemetry.env_file,
        target_program = telemetry.target,
        interpreter = telemetry.interpreter,
        variables = ?telemetry.variable_names,
        skipped_lines = telemetry.skipped_lines,
        "Replacing launcher with target program"
    );
}
