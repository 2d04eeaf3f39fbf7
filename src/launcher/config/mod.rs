//! Load and validate the optional `launcher.toml` settings file.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::error;

use crate::lib::errors::SettingsError;

pub mod env;
pub mod launcher;
pub mod telemetry;

pub use env::{parse_env_section, EnvSection, RawEnvSection};
pub use launcher::{
    parse_launcher_section, LauncherSection, RawLauncherSection, DEFAULT_ENV_FILE,
    DEFAULT_INTERPRETER, DEFAULT_TARGET,
};

/// Settings file looked up next to the executable.
pub const SETTINGS_FILE_NAME: &str = "launcher.toml";

/// Top-level settings container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherSettings {
    pub launcher: LauncherSection,
    pub env: EnvSection,
    /// `None` when running on built-in defaults.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawLauncherSettings {
    launcher: Option<RawLauncherSection>,
    env: Option<RawEnvSection>,
}

impl LauncherSettings {
    /// Load `<install_dir>/launcher.toml`, falling back to defaults when absent.
    pub fn load_from_install_dir(install_dir: &Path) -> Result<Self, SettingsError> {
        let path = install_dir.join(SETTINGS_FILE_NAME);
        telemetry::log_source(&path, false);
        if !path.exists() {
            telemetry::log_defaults(&path);
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Load an explicitly requested settings file; it must exist.
    pub fn load_explicit(path: PathBuf) -> Result<Self, SettingsError> {
        telemetry::log_source(&path, true);
        if !path.is_file() {
            return Err(SettingsError::NotFound { path });
        }
        Self::load_from_path(path)
    }

    /// Load settings from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, SettingsError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_path()).format(config::FileFormat::Toml));
        let document = builder.build().map_err(|err| {
            let error = SettingsError::from_read_error(path.clone(), err);
            error!(
                target: "run_mail::config",
                path = %path.display(),
                reason = %error,
                "Failed to read settings file"
            );
            error
        })?;

        let raw: RawLauncherSettings = document.try_deserialize().map_err(|err| {
            let error = SettingsError::from_parse_error(path.clone(), err);
            error!(
                target: "run_mail::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse settings file"
            );
            error
        })?;

        let settings = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "run_mail::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate settings file"
            );
            err
        })?;

        telemetry::log_loaded(&settings);
        Ok(settings)
    }

    fn from_raw(raw: RawLauncherSettings, path: PathBuf) -> Result<Self, SettingsError> {
        let launcher = parse_launcher_section(raw.launcher, &path)?;
        let env = parse_env_section(raw.env, &path)?;

        Ok(Self {
            launcher,
            env,
            source_path: Some(path),
        })
    }
}
