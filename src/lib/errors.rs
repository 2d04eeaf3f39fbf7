use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Exit status when the launcher cannot determine where it is installed (EX_SOFTWARE).
pub const EXIT_RESOLVE_DIR: u8 = 70;
/// Exit status for an env file line that cannot be parsed (EX_DATAERR).
pub const EXIT_MALFORMED_ENV: u8 = 65;
/// Exit status for a missing or unreadable env file (EX_NOINPUT).
pub const EXIT_MISSING_CONFIG: u8 = 66;
/// Exit status for invalid launcher settings or missing required variables (EX_CONFIG).
pub const EXIT_SETTINGS: u8 = 78;
/// Exit status when the target or interpreter does not exist, as a shell reports it.
pub const EXIT_NOT_FOUND: u8 = 127;
/// Exit status when the interpreter exists but could not be executed.
pub const EXIT_CANNOT_EXECUTE: u8 = 126;

/// Errors that can occur while loading or validating `launcher.toml`.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to build (read) the settings file.
    #[error("Failed to read settings file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// An explicitly requested settings file does not exist.
    #[error("Settings file {path} does not exist")]
    NotFound { path: PathBuf },
    /// Field failed validation.
    #[error("Settings file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl SettingsError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Everything that can stop the launcher before control is handed to the target.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to resolve the launcher installation directory: {source}")]
    ResolveDir {
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Environment file {path} could not be read: {source}")]
    MissingConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Environment file {path} line {line}: {message}")]
    MalformedEnv {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("Required variable `{key}` is not set (expected in {path})")]
    MissingVariable { path: PathBuf, key: String },
    #[error("Target program {path} does not exist")]
    MissingTarget { path: PathBuf },
    #[error("Interpreter `{name}` was not found: {source}")]
    InterpreterNotFound {
        name: String,
        #[source]
        source: which::Error,
    },
    #[error("Failed to execute {program}: {source}")]
    Exec {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            LaunchError::ResolveDir { .. } => EXIT_RESOLVE_DIR,
            LaunchError::Settings(_) | LaunchError::MissingVariable { .. } => EXIT_SETTINGS,
            LaunchError::MissingConfig { .. } => EXIT_MISSING_CONFIG,
            LaunchError::MalformedEnv { .. } => EXIT_MALFORMED_ENV,
            LaunchError::MissingTarget { .. } | LaunchError::InterpreterNotFound { .. } => {
                EXIT_NOT_FOUND
            }
            LaunchError::Exec { source, .. } => match source.raw_os_error() {
                Some(libc::ENOENT) => EXIT_NOT_FOUND,
                _ => EXIT_CANNOT_EXECUTE,
            },
        }
    }

    /// Short machine-friendly label used in logs and check reports.
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchError::ResolveDir { .. } => "resolve_dir",
            LaunchError::Settings(_) => "settings",
            LaunchError::MissingConfig { .. } => "missing_config",
            LaunchError::MalformedEnv { .. } => "malformed_env",
            LaunchError::MissingVariable { .. } => "missing_variable",
            LaunchError::MissingTarget { .. } => "missing_target",
            LaunchError::InterpreterNotFound { .. } | LaunchError::Exec { .. } => "exec",
        }
    }
}
