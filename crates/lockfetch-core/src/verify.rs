//! Offline integrity check of a populated target directory against the
//! lockfile's `--hash=sha256:` pins.

use std::path::{Path, PathBuf};

use crate::checksum;
use crate::locator;
use crate::lockfile::{Lockfile, RequirementSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStatus {
    /// Digest matches one of the declared hashes.
    Verified { path: PathBuf },
    Mismatch { path: PathBuf, actual: String },
    /// No artifact for this requirement in the target directory.
    Missing,
    /// The requirement declares no sha256 hash; nothing to check against.
    NoHashes,
    /// The artifact exists but could not be read.
    Unreadable { path: PathBuf, message: String },
}

#[derive(Debug, Clone)]
pub struct VerifyEntry {
    pub name: String,
    pub version: String,
    pub status: VerifyStatus,
}

impl VerifyEntry {
    pub fn is_problem(&self) -> bool {
        matches!(
            self.status,
            VerifyStatus::Mismatch { .. } | VerifyStatus::Missing | VerifyStatus::Unreadable { .. }
        )
    }
}

/// Outcome of verifying every requirement, in lockfile order.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub entries: Vec<VerifyEntry>,
}

impl VerifyReport {
    pub fn problems(&self) -> impl Iterator<Item = &VerifyEntry> {
        self.entries.iter().filter(|e| e.is_problem())
    }

    pub fn verified_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, VerifyStatus::Verified { .. }))
            .count()
    }

    /// 0 iff no artifact is missing, unreadable, or mismatched.
    pub fn exit_code(&self) -> i32 {
        if self.problems().next().is_none() {
            0
        } else {
            1
        }
    }
}

/// Check one requirement's artifact in `target_dir`.
pub fn verify_requirement(target_dir: &Path, spec: &RequirementSpec) -> VerifyEntry {
    let expected = spec.sha256_hashes();
    let status = match locator::locate(target_dir, spec.name(), spec.version()) {
        None => VerifyStatus::Missing,
        Some(_) if expected.is_empty() => VerifyStatus::NoHashes,
        Some(found) => match checksum::sha256_path(&found.path) {
            Ok(actual) if expected.iter().any(|h| *h == actual) => {
                VerifyStatus::Verified { path: found.path }
            }
            Ok(actual) => {
                tracing::warn!(name = spec.name(), path = %found.path.display(), %actual, "sha256 mismatch");
                VerifyStatus::Mismatch {
                    path: found.path,
                    actual,
                }
            }
            Err(e) => VerifyStatus::Unreadable {
                path: found.path,
                message: format!("{:#}", e),
            },
        },
    };
    VerifyEntry {
        name: spec.name().to_string(),
        version: spec.version().to_string(),
        status,
    }
}

/// Verify every requirement of `lockfile` against `target_dir`.
pub fn verify_dir(lockfile: &Lockfile, target_dir: &Path) -> VerifyReport {
    let entries = lockfile
        .requirements
        .iter()
        .map(|spec| verify_requirement(target_dir, spec))
        .collect();
    VerifyReport { entries }
}
