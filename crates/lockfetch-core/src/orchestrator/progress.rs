//! Progress events emitted once per completed job.

use crate::result::FetchResult;

/// Snapshot delivered to the observer each time a job reports.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent<'a> {
    /// Jobs completed so far, including this one (1-based).
    pub completed: usize,
    pub total: usize,
    pub result: &'a FetchResult,
}

impl ProgressEvent<'_> {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    /// One status line, e.g. `[3/10] ok   numpy==1.26.4 (17.4 MiB)`.
    pub fn line(&self) -> String {
        let r = self.result;
        let width = self.total.to_string().len();
        let (tag, detail) = if r.is_ambiguous() {
            ("ok?", " (ambiguous)".to_string())
        } else if r.is_success() {
            ("ok", format!(" ({})", r.size_label()))
        } else {
            ("FAILED", String::new())
        };
        format!(
            "[{:>width$}/{}] {:<6} {}=={}{}",
            self.completed,
            self.total,
            tag,
            r.name,
            r.version,
            detail,
            width = width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchFailure;
    use crate::lockfile::RequirementSpec;
    use crate::result::FetchOutcome;
    use std::path::PathBuf;
    use std::time::Duration;

    fn result(outcome: FetchOutcome) -> FetchResult {
        FetchResult::new(&RequirementSpec::new("foo==1.0"), outcome, Duration::ZERO)
    }

    #[test]
    fn fraction_and_line() {
        let r = result(FetchOutcome::Fetched {
            path: PathBuf::from("x.whl"),
            size: 1024,
        });
        let ev = ProgressEvent {
            completed: 3,
            total: 12,
            result: &r,
        };
        assert!((ev.fraction() - 0.25).abs() < 1e-9);
        assert_eq!(ev.line(), "[ 3/12] ok     foo==1.0 (1.0 KiB)");
    }

    #[test]
    fn failed_and_ambiguous_lines() {
        let failed = result(FetchOutcome::Failed(FetchFailure::TempFile {
            message: "x".to_string(),
        }));
        let ev = ProgressEvent {
            completed: 1,
            total: 2,
            result: &failed,
        };
        assert_eq!(ev.line(), "[1/2] FAILED foo==1.0");

        let amb = result(FetchOutcome::Ambiguous);
        let ev = ProgressEvent {
            completed: 2,
            total: 2,
            result: &amb,
        };
        assert_eq!(ev.line(), "[2/2] ok?    foo==1.0 (ambiguous)");
    }
}
