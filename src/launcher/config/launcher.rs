use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::SettingsError;

pub const DEFAULT_ENV_FILE: &str = ".gmail_env";
pub const DEFAULT_TARGET: &str = "send_mail_test_v3.py";
pub const DEFAULT_INTERPRETER: &str = "python3";

/// What to load and what to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSection {
    pub env_file: PathBuf,
    pub target: PathBuf,
    pub interpreter: String,
}

impl Default for LauncherSection {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            target: PathBuf::from(DEFAULT_TARGET),
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLauncherSection {
    pub env_file: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub interpreter: Option<String>,
}

pub fn parse_launcher_section(
    raw: Option<RawLauncherSection>,
    path: &Path,
) -> Result<LauncherSection, SettingsError> {
    let raw = raw.unwrap_or_default();
    let defaults = LauncherSection::default();

    let env_file = raw.env_file.unwrap_or(defaults.env_file);
    validate_file_path(path, "launcher.env_file", &env_file)?;

    let target = raw.target.unwrap_or(defaults.target);
    validate_file_path(path, "launcher.target", &target)?;

    let interpreter = raw.interpreter.unwrap_or(defaults.interpreter);
    if interpreter.trim().is_empty() {
        return Err(SettingsError::InvalidField {
            path: path.to_path_buf(),
            field: "launcher.interpreter",
            message: "must not be empty".into(),
        });
    }

    Ok(LauncherSection {
        env_file,
        target,
        interpreter,
    })
}

fn validate_file_path(
    path: &Path,
    field: &'static str,
    value: &Path,
) -> Result<(), SettingsError> {
    if value.as_os_str().is_empty() {
        return Err(SettingsError::InvalidField {
            path: path.to_path_buf(),
            field,
            message: "must not be empty".into(),
        });
    }
    if value.file_name().is_none() {
        return Err(SettingsError::InvalidField {
            path: path.to_path_buf(),
            field,
            message: format!("{} does not name a file", value.display()),
        });
    }
    Ok(())
}
