//! Run summary: totals, failure listing, terminal status.
//!
//! Built once from the complete result set; there is no partially valid
//! summary. The exit status is all-or-nothing: a single failed fetch fails
//! the run no matter how many others succeeded.

mod json;
mod render;

pub use json::{write_json, JsonReport};
pub use render::{format_bytes, render, tail_chars};

use std::time::Duration;

use crate::result::FetchResult;

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// At least one fetch failed.
    Failure,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failure => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == RunStatus::Success
    }
}

/// Aggregate of one run's results.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successes whose artifact could not be located (size unknown).
    pub ambiguous: usize,
    /// Sum of sizes of successful results only.
    pub total_bytes: u64,
    pub elapsed: Duration,
    results: Vec<FetchResult>,
}

impl RunSummary {
    pub fn from_results(results: Vec<FetchResult>, elapsed: Duration) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let ambiguous = results.iter().filter(|r| r.is_ambiguous()).count();
        let total_bytes = results
            .iter()
            .filter(|r| r.is_success())
            .map(FetchResult::size)
            .sum();
        Self {
            total,
            succeeded,
            failed: total - succeeded,
            ambiguous,
            total_bytes,
            elapsed,
            results,
        }
    }

    pub fn status(&self) -> RunStatus {
        if self.failed == 0 {
            RunStatus::Success
        } else {
            RunStatus::Failure
        }
    }

    /// All results, in completion order.
    pub fn results(&self) -> &[FetchResult] {
        &self.results
    }

    /// Failed results, ordered by name for a stable listing.
    pub fn failures(&self) -> Vec<&FetchResult> {
        let mut failed: Vec<_> = self.results.iter().filter(|r| !r.is_success()).collect();
        failed.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
        failed
    }

    pub fn ambiguous_results(&self) -> Vec<&FetchResult> {
        let mut amb: Vec<_> = self.results.iter().filter(|r| r.is_ambiguous()).collect();
        amb.sort_by(|a, b| a.name.cmp(&b.name));
        amb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchFailure;
    use crate::lockfile::RequirementSpec;
    use crate::result::FetchOutcome;
    use std::path::PathBuf;

    fn fetched(line: &str, size: u64) -> FetchResult {
        FetchResult::new(
            &RequirementSpec::new(line),
            FetchOutcome::Fetched {
                path: PathBuf::from(format!("{}.whl", line)),
                size,
            },
            Duration::ZERO,
        )
    }

    fn failed(line: &str) -> FetchResult {
        FetchResult::new(
            &RequirementSpec::new(line),
            FetchOutcome::Failed(FetchFailure::NonZeroExit {
                code: Some(1),
                diagnostic: "hash mismatch".to_string(),
            }),
            Duration::ZERO,
        )
    }

    #[test]
    fn all_success() {
        let s = RunSummary::from_results(
            vec![fetched("a==1", 10), fetched("b==1", 20), fetched("c==1", 30)],
            Duration::ZERO,
        );
        assert_eq!((s.total, s.succeeded, s.failed), (3, 3, 0));
        assert_eq!(s.total_bytes, 60);
        assert_eq!(s.status(), RunStatus::Success);
        assert_eq!(s.status().exit_code(), 0);
    }

    #[test]
    fn one_failure_fails_run() {
        let s = RunSummary::from_results(
            vec![fetched("a==1", 10), failed("b==1"), fetched("c==1", 5)],
            Duration::ZERO,
        );
        assert_eq!((s.total, s.succeeded, s.failed), (3, 2, 1));
        assert_eq!(s.total_bytes, 15);
        assert_eq!(s.status(), RunStatus::Failure);
        assert_ne!(s.status().exit_code(), 0);
        assert_eq!(s.failures()[0].name, "b");
    }

    #[test]
    fn empty_run_is_success() {
        let s = RunSummary::from_results(Vec::new(), Duration::ZERO);
        assert_eq!(s.total, 0);
        assert_eq!(s.status(), RunStatus::Success);
    }

    #[test]
    fn ambiguous_counts_as_success_without_bytes() {
        let amb = FetchResult::new(
            &RequirementSpec::new("x==1"),
            FetchOutcome::Ambiguous,
            Duration::ZERO,
        );
        let s = RunSummary::from_results(vec![amb, fetched("y==1", 7)], Duration::ZERO);
        assert_eq!(s.succeeded, 2);
        assert_eq!(s.failed, 0);
        assert_eq!(s.ambiguous, 1);
        assert_eq!(s.total_bytes, 7);
        assert!(s.status().is_success());
    }

    #[test]
    fn total_bytes_is_sum_of_successes() {
        let results = vec![fetched("a==1", 3), failed("b==1"), fetched("c==1", 4)];
        let expected: u64 = results.iter().filter(|r| r.is_success()).map(|r| r.size()).sum();
        let s = RunSummary::from_results(results, Duration::ZERO);
        assert_eq!(s.total_bytes, expected);
    }
}
