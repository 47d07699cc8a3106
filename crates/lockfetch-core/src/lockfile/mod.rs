//! Lockfile reading: logical-line reconstruction, global options, requirements.
//!
//! A lockfile is the pip-style `requirements.txt` emitted by a lock tool:
//! one requirement per logical line, hash directives on continuation lines,
//! and a handful of global flags (index URLs, trusted hosts) that apply to
//! every fetch.

mod error;
mod parse;
mod requirement;

pub use error::ParseError;
pub use parse::{is_global_option, parse_str, GLOBAL_OPTION_PREFIXES};
pub use requirement::{RequirementSpec, ANY_VERSION};

use std::path::Path;

/// Parsed lockfile: requirements in input order plus global fetch options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lockfile {
    pub requirements: Vec<RequirementSpec>,
    /// Argv tokens for the fetch command, in lockfile order.
    pub global_options: Vec<String>,
}

impl Lockfile {
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

/// Read and parse the lockfile at `path`.
pub fn parse_file(path: &Path) -> Result<Lockfile, ParseError> {
    if !path.exists() {
        return Err(ParseError::MissingFile(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let lockfile = parse_str(&text)?;
    tracing::debug!(
        path = %path.display(),
        requirements = lockfile.requirements.len(),
        global_options = lockfile.global_options.len(),
        "parsed lockfile"
    );
    Ok(lockfile)
}
