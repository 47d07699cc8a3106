//! Download orchestration.
//!
//! Fans the lockfile's requirements out to a bounded pool of fetch workers
//! and fans the results back in, in completion order. Jobs are independent:
//! a failing fetch never cancels or delays its siblings, and the run only
//! ends once every requirement has produced exactly one result.

mod pool;
mod progress;

pub use progress::ProgressEvent;

use std::time::Instant;

use crate::fetcher::{self, FetchCommand};
use crate::lockfile::RequirementSpec;
use crate::result::FetchResult;

/// Owns the worker bound and the shared base command for one run.
#[derive(Debug, Clone)]
pub struct DownloadOrchestrator {
    command: FetchCommand,
    workers: usize,
}

impl DownloadOrchestrator {
    /// `workers` is an upper bound on concurrent fetches; 0 is treated as 1.
    pub fn new(command: FetchCommand, workers: usize) -> Self {
        Self {
            command,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn command(&self) -> &FetchCommand {
        &self.command
    }

    /// Fetch every requirement. `on_progress` is called on the calling
    /// thread once per completed job, success or failure.
    pub fn run<P>(&self, requirements: &[RequirementSpec], on_progress: P) -> Vec<FetchResult>
    where
        P: FnMut(ProgressEvent<'_>),
    {
        let effective = self.workers.min(requirements.len().max(1));
        tracing::info!(
            requirements = requirements.len(),
            workers = effective,
            dest = %self.command.target_dir().display(),
            "starting fetch run"
        );
        let start = Instant::now();
        let command = &self.command;
        let results = pool::run_pool(
            requirements,
            self.workers,
            |spec| fetcher::fetch_one(command, spec),
            on_progress,
        );
        tracing::info!(
            results = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetch run finished"
        );
        results
    }
}
