//! Assemble everything the exec needs, failing before any side effect.

use std::{env, path::PathBuf};

use tracing::debug;

use super::exec::resolve_interpreter;
use crate::{
    cli::LaunchProfile,
    launcher::config::LauncherSettings,
    lib::{
        envfile::{load_env_file, EnvFile, EnvFileOptions, MalformedLinePolicy},
        errors::LaunchError,
        paths::sibling,
    },
};

/// Fully resolved description of the process that will replace the launcher.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub install_dir: PathBuf,
    pub env_file: EnvFile,
    pub target: PathBuf,
    pub interpreter: PathBuf,
    /// Assignments applied on top of the inherited environment.
    pub variables: Vec<(String, String)>,
}

impl LaunchPlan {
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|(key, _)| key.clone()).collect()
    }
}

/// Read `launcher.toml` from the explicit path or the install directory.
pub fn load_settings(profile: &LaunchProfile) -> Result<LauncherSettings, LaunchError> {
    let settings = match &profile.settings_path {
        Some(path) => LauncherSettings::load_explicit(path.clone())?,
        None => LauncherSettings::load_from_install_dir(&profile.install_dir)?,
    };
    Ok(settings)
}

/// Load the env file, then check the target, then locate the interpreter.
///
/// The order matters: a missing env file is reported without ever looking at
/// the target program.
pub fn build_plan(
    profile: &LaunchProfile,
    settings: &LauncherSettings,
) -> Result<LaunchPlan, LaunchError> {
    let install_dir = profile.install_dir.as_path();

    let env_path = sibling(
        install_dir,
        profile
            .env_file
            .as_deref()
            .unwrap_or(settings.launcher.env_file.as_path()),
    );
    let options = EnvFileOptions {
        malformed: if profile.lenient {
            MalformedLinePolicy::Warn
        } else {
            settings.env.malformed
        },
        override_existing: settings.env.override_existing,
    };
    let env_file = load_env_file(&env_path, options)?;

    let variables = select_variables(&env_file, settings.env.override_existing);
    ensure_required(&settings.env.required, &variables, &env_file)?;

    let target = sibling(
        install_dir,
        profile
            .target
            .as_deref()
            .unwrap_or(settings.launcher.target.as_path()),
    );
    if !target.is_file() {
        return Err(LaunchError::MissingTarget { path: target });
    }

    let interpreter_name = profile
        .interpreter
        .as_deref()
        .unwrap_or(settings.launcher.interpreter.as_str());
    let interpreter = resolve_interpreter(interpreter_name, &variables, install_dir)?;

    Ok(LaunchPlan {
        install_dir: install_dir.to_path_buf(),
        env_file,
        target,
        interpreter,
        variables,
    })
}

/// With `override_existing = false`, inherited variables keep their value.
fn select_variables(env_file: &EnvFile, override_existing: bool) -> Vec<(String, String)> {
    let variables = env_file.variables();
    if override_existing {
        return variables;
    }
    variables
        .into_iter()
        .filter(|(key, _)| {
            let inherited = env::var_os(key).is_some();
            if inherited {
                debug!(
                    target: "run_mail::envfile",
                    key = %key,
                    "Keeping inherited value"
                );
            }
            !inherited
        })
        .collect()
}

fn ensure_required(
    required: &[String],
    variables: &[(String, String)],
    env_file: &EnvFile,
) -> Result<(), LaunchError> {
    for key in required {
        let value = variables
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
            .or_else(|| env::var(key).ok());
        if value.map_or(true, |v| v.is_empty()) {
            return Err(LaunchError::MissingVariable {
                path: env_file.path.clone(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}
