//! Fixed-shape record produced exactly once per requirement.

use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::FetchFailure;
use crate::lockfile::RequirementSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fetched and located on disk.
    Fetched { path: PathBuf, size: u64 },
    /// The fetch command succeeded but no matching file was found (e.g. it
    /// resolved from its own cache). Counts as success with unknown size.
    Ambiguous,
    Failed(FetchFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub name: String,
    pub version: String,
    pub outcome: FetchOutcome,
    pub elapsed: Duration,
}

impl FetchResult {
    pub fn new(spec: &RequirementSpec, outcome: FetchOutcome, elapsed: Duration) -> Self {
        Self {
            name: spec.name().to_string(),
            version: spec.version().to_string(),
            outcome,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, FetchOutcome::Failed(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Ambiguous)
    }

    /// Artifact size in bytes; 0 when unknown or failed.
    pub fn size(&self) -> u64 {
        match self.outcome {
            FetchOutcome::Fetched { size, .. } => size,
            _ => 0,
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match &self.outcome {
            FetchOutcome::Fetched { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Present iff the fetch failed.
    pub fn error(&self) -> Option<&FetchFailure> {
        match &self.outcome {
            FetchOutcome::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// Human-readable size: "ambiguous" when the artifact could not be located.
    pub fn size_label(&self) -> String {
        match &self.outcome {
            FetchOutcome::Fetched { size, .. } => crate::report::format_bytes(*size),
            FetchOutcome::Ambiguous => "ambiguous".to_string(),
            FetchOutcome::Failed(_) => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> RequirementSpec {
        RequirementSpec::new("foo==1.0")
    }

    #[test]
    fn fetched_result_reports_size() {
        let r = FetchResult::new(
            &spec(),
            FetchOutcome::Fetched {
                path: PathBuf::from("/w/foo-1.0-py3-none-any.whl"),
                size: 2048,
            },
            Duration::from_millis(5),
        );
        assert!(r.is_success());
        assert_eq!(r.size(), 2048);
        assert!(r.error().is_none());
        assert_eq!(r.size_label(), "2.0 KiB");
    }

    #[test]
    fn ambiguous_is_success_with_unknown_size() {
        let r = FetchResult::new(&spec(), FetchOutcome::Ambiguous, Duration::ZERO);
        assert!(r.is_success());
        assert!(r.is_ambiguous());
        assert_eq!(r.size(), 0);
        assert_eq!(r.size_label(), "ambiguous");
        assert!(r.path().is_none());
    }

    #[test]
    fn failed_has_error() {
        let r = FetchResult::new(
            &spec(),
            FetchOutcome::Failed(FetchFailure::TempFile {
                message: "disk full".to_string(),
            }),
            Duration::ZERO,
        );
        assert!(!r.is_success());
        assert_eq!(r.size(), 0);
        assert!(r.error().is_some());
    }
}
