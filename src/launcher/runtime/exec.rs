//! Interpreter lookup and process replacement.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::debug;

use super::plan::LaunchPlan;
use crate::lib::errors::LaunchError;

/// Locate `name` the way the replaced process would: on the `PATH` the env
/// file leaves behind, or relative to `install_dir` when `name` is a path.
pub fn resolve_interpreter(
    name: &str,
    variables: &[(String, String)],
    install_dir: &Path,
) -> Result<PathBuf, LaunchError> {
    let search_path: Option<OsString> = variables
        .iter()
        .find(|(key, _)| key == "PATH")
        .map(|(_, value)| OsString::from(value))
        .or_else(|| env::var_os("PATH"));

    let found = which::which_in(name, search_path.as_ref(), install_dir).map_err(|source| {
        LaunchError::InterpreterNotFound {
            name: name.to_string(),
            source,
        }
    })?;
    debug!(
        target: "run_mail::runtime",
        interpreter = name,
        path = %found.display(),
        "Resolved interpreter"
    );
    Ok(found)
}

/// `interpreter target` with the env file applied over the inherited environment.
pub fn build_command(plan: &LaunchPlan) -> Command {
    let mut command = Command::new(&plan.interpreter);
    command.arg(&plan.target);
    command.envs(
        plan.variables
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    command
}

/// Replace the current process with the planned command. Returns only on failure.
#[cfg(unix)]
pub fn replace_process(plan: &LaunchPlan) -> LaunchError {
    use std::os::unix::process::CommandExt;

    let source = build_command(plan).exec();
    LaunchError::Exec {
        program: plan.interpreter.clone(),
        source,
    }
}

/// Run the planned command to completion and exit with its status.
#[cfg(not(unix))]
pub fn replace_process(plan: &LaunchPlan) -> LaunchError {
    match build_command(plan).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => LaunchError::Exec {
            program: plan.interpreter.clone(),
            source,
        },
    }
}
