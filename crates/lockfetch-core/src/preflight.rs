//! Checks that must pass before any fetch job is scheduled.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("target path {} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot create target directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Make sure `target` is a usable directory, creating it if needed, and
/// return its absolute path (the fetch command runs with its own cwd rules).
pub fn prepare_target_dir(target: &Path) -> Result<PathBuf, PreflightError> {
    if target.exists() && !target.is_dir() {
        return Err(PreflightError::NotADirectory(target.to_path_buf()));
    }
    std::fs::create_dir_all(target).map_err(|source| PreflightError::CreateDir {
        path: target.to_path_buf(),
        source,
    })?;
    let absolute = target
        .canonicalize()
        .map_err(|source| PreflightError::CreateDir {
            path: target.to_path_buf(),
            source,
        })?;
    tracing::debug!(dir = %absolute.display(), "target directory ready");
    Ok(absolute)
}
