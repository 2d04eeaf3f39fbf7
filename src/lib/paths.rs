//! Install directory resolution and sibling path helpers.

use std::{
    env, io,
    path::{Path, PathBuf},
};

/// Returns true if the path is non-empty and absolute.
pub fn is_nonempty_absolute(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_absolute()
}

/// Real directory containing the running executable, with symlinks resolved.
pub fn resolve_install_dir() -> io::Result<PathBuf> {
    install_dir_of(&env::current_exe()?)
}

/// Real directory containing `executable`, with symlinks resolved.
pub fn install_dir_of(executable: &Path) -> io::Result<PathBuf> {
    let real = executable.canonicalize()?;
    real.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} has no parent directory", real.display()),
        )
    })
}

/// Canonicalize an explicitly supplied directory, relative to `cwd` when needed.
pub fn canonical_dir(path: &Path, cwd: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let real = joined.canonicalize()?;
    if !real.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", real.display()),
        ));
    }
    Ok(real)
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn sibling(base: &Path, path: &Path) -> PathBuf {
    if is_nonempty_absolute(path) {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
