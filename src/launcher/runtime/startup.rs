use std::process::ExitCode;

use anyhow::Error;

use super::{
    exec::replace_process,
    plan::{build_plan, load_settings, LaunchPlan},
};
use crate::{
    cli::LaunchProfile,
    lib::{errors::LaunchError, telemetry},
};

/// Bundles a launch failure message with the exit code it maps to.
#[derive(Debug)]
pub struct LaunchExit {
    message: String,
    exit_code: ExitCode,
    kind: &'static str,
}

impl LaunchExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
            kind: "internal",
        }
    }

    pub fn report(self) -> ExitCode {
        tracing::debug!(
            target: "run_mail::runtime",
            kind = self.kind,
            "Launch aborted"
        );
        eprintln!("run-mail: {}", self.message);
        self.exit_code
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl From<LaunchError> for LaunchExit {
    fn from(err: LaunchError) -> Self {
        Self {
            message: err.to_string(),
            exit_code: ExitCode::from(err.exit_code()),
            kind: err.kind(),
        }
    }
}

/// Resolve settings and build the plan without executing anything.
pub fn prepare(profile: &LaunchProfile) -> Result<LaunchPlan, LaunchExit> {
    let settings = load_settings(profile)?;
    Ok(build_plan(profile, &settings)?)
}

/// Load the environment and hand the process over to the target program.
///
/// On Unix this only returns when the exec itself fails.
pub fn run(profile: LaunchProfile) -> Result<(), LaunchExit> {
    let plan = prepare(&profile)?;

    let install_dir = plan.install_dir.display().to_string();
    let env_file = plan.env_file.path.display().to_string();
    let target = plan.target.display().to_string();
    let interpreter = plan.interpreter.display().to_string();
    let variable_names = plan.variable_names();
    telemetry::emit_launch(&telemetry::LaunchTelemetry {
        install_dir: &install_dir,
        env_file: &env_file,
        target: &target,
        interpreter: &interpreter,
        variable_names: &variable_names,
        skipped_lines: plan.env_file.skipped.len(),
    });

    Err(replace_process(&plan).into())
}
