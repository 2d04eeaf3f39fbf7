//! LaunchProfile and install directory resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::lib::{errors::LaunchError, paths};

const RUN_MAIL_DIR_ENV: &str = "RUN_MAIL_DIR";

/// Where the install directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSource {
    Cli,
    Env,
    Executable,
}

impl DirSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DirSource::Cli => "cli",
            DirSource::Env => "env",
            DirSource::Executable => "executable",
        }
    }
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    /// Real directory holding the env file and the target program.
    pub install_dir: PathBuf,
    pub dir_source: DirSource,
    /// Explicit `--settings`; `None` means `<install_dir>/launcher.toml` if present.
    pub settings_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub interpreter: Option<String>,
    pub lenient: bool,
}

/// Resolve the install directory in the order: CLI override → env var → executable.
pub fn resolve_install_dir(
    override_dir: Option<PathBuf>,
) -> Result<(PathBuf, DirSource), LaunchError> {
    resolve_install_dir_from(override_dir, env::var_os(RUN_MAIL_DIR_ENV).map(PathBuf::from))
}

fn resolve_install_dir_from(
    override_dir: Option<PathBuf>,
    env_dir: Option<PathBuf>,
) -> Result<(PathBuf, DirSource), LaunchError> {
    let explicit = match (override_dir, env_dir.filter(|p| !p.as_os_str().is_empty())) {
        (Some(dir), _) => Some((dir, DirSource::Cli)),
        (None, Some(dir)) => Some((dir, DirSource::Env)),
        (None, None) => None,
    };

    let resolved = match explicit {
        Some((dir, origin)) => {
            let cwd = env::current_dir().map_err(|source| LaunchError::ResolveDir { source })?;
            (canonical_dir(&dir, &cwd)?, origin)
        }
        None => (
            paths::resolve_install_dir().map_err(|source| LaunchError::ResolveDir { source })?,
            DirSource::Executable,
        ),
    };
    Ok(resolved)
}

fn canonical_dir(dir: &Path, cwd: &Path) -> Result<PathBuf, LaunchError> {
    paths::canonical_dir(dir, cwd).map_err(|source| LaunchError::ResolveDir { source })
}

/// Resolve an explicit settings path against the working directory.
pub fn resolve_settings_path(
    override_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, LaunchError> {
    let Some(path) = override_path else {
        return Ok(None);
    };
    if path.is_absolute() {
        return Ok(Some(path));
    }
    let cwd = env::current_dir().map_err(|source| LaunchError::ResolveDir { source })?;
    Ok(Some(cwd.join(path)))
}
