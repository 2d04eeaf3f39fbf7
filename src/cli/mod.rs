//! CLI entrypoint module structure.
use anyhow::Result;
use serde_json::json;

use crate::launcher::runtime::LaunchPlan;

pub mod args;
pub mod profile;

pub use args::{LaunchArgs, ParsedCommand};
pub use profile::{resolve_install_dir, resolve_settings_path, DirSource, LaunchProfile};

/// Format a `--check` result. Variable values never appear in the payload.
pub fn render_check_report(plan: &LaunchPlan) -> Result<String> {
    let skipped_lines = plan
        .env_file
        .skipped
        .iter()
        .map(|skipped| json!({ "line": skipped.line, "reason": skipped.reason }))
        .collect::<Vec<_>>();

    let payload = json!({
        "status": "ready",
        "install_dir": plan.install_dir.to_string_lossy(),
        "env_file": plan.env_file.path.to_string_lossy(),
        "target": plan.target.to_string_lossy(),
        "interpreter": plan.interpreter.to_string_lossy(),
        "variables": plan.variable_names(),
        "skipped_lines": skipped_lines,
    });

    Ok(serde_json::to_string_pretty(&payload)?)
}
