//! Post-fetch artifact discovery: map (name, version) to a file in the
//! target directory and report its size.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::lockfile::ANY_VERSION;

/// Wheel filename suffix: `{name}-{version}-{tags}.whl`.
pub const WHEEL_SUFFIX: &str = ".whl";

/// Source archive suffixes: `{name}-{version}.tar.gz` / `.zip`.
pub const SOURCE_ARCHIVE_SUFFIXES: [&str; 2] = [".tar.gz", ".zip"];

/// A downloaded artifact found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedArtifact {
    pub path: PathBuf,
    pub size: u64,
}

/// Name spellings to probe: the underscore-normalized form first (as wheel
/// filenames are written), then the raw name.
pub fn name_variants(name: &str) -> Vec<String> {
    let normalized = name.replace('-', "_");
    if normalized == name {
        vec![normalized]
    } else {
        vec![normalized, name.to_string()]
    }
}

/// Glob patterns in probe order. Directory, name and version are escaped;
/// an unpinned version becomes a wildcard.
pub fn candidate_patterns(dir: &Path, name: &str, version: &str) -> Vec<String> {
    let dir = Pattern::escape(&dir.to_string_lossy());
    let version = if version == ANY_VERSION {
        "*".to_string()
    } else {
        Pattern::escape(version)
    };

    let mut patterns = Vec::new();
    for variant in name_variants(name) {
        let stem = format!("{}-{}", Pattern::escape(&variant), version);
        patterns.push(join(&dir, &format!("{}-*{}", stem, WHEEL_SUFFIX)));
        for suffix in SOURCE_ARCHIVE_SUFFIXES {
            patterns.push(join(&dir, &format!("{}{}", stem, suffix)));
        }
    }
    patterns
}

fn join(dir: &str, file_pattern: &str) -> String {
    Path::new(dir).join(file_pattern).to_string_lossy().into_owned()
}

/// Find the artifact for `name`/`version` in `dir`.
///
/// The first pattern with any match wins; among several matches for one
/// pattern the most recently modified file is chosen, so leftovers from an
/// unrelated earlier run don't shadow a fresh download. Package names are
/// matched case-insensitively.
pub fn locate(dir: &Path, name: &str, version: &str) -> Option<LocatedArtifact> {
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    for pattern in candidate_patterns(dir, name, version) {
        let paths = match glob::glob_with(&pattern, options) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(pattern = %pattern, error = %e, "skipping invalid locator pattern");
                continue;
            }
        };

        let newest = paths
            .filter_map(Result::ok)
            .filter_map(|path| {
                let meta = std::fs::metadata(&path).ok()?;
                if !meta.is_file() {
                    return None;
                }
                let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                Some((modified, meta.len(), path))
            })
            .max_by_key(|(modified, _, _)| *modified);

        if let Some((_, size, path)) = newest {
            tracing::debug!(name, version, path = %path.display(), size, "located artifact");
            return Some(LocatedArtifact { path, size });
        }
    }
    None
}
