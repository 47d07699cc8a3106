//! Lockfile errors. All are fatal: they abort the run before any fetch starts.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("lockfile not found at {}", .0.display())]
    MissingFile(PathBuf),

    #[error("cannot read lockfile {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global option line whose quoting cannot be split into arguments.
    #[error("invalid global option line: {line}")]
    InvalidOption { line: String },
}
