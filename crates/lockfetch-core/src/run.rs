//! One complete fetch run: preflight, parse, orchestrate, summarize.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{FetchCommandConfig, LockfetchConfig};
use crate::fetcher::FetchCommand;
use crate::lockfile;
use crate::orchestrator::{DownloadOrchestrator, ProgressEvent};
use crate::preflight;
use crate::report::RunSummary;

/// Everything a run needs, resolved once at startup from config and CLI flags.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub lockfile: PathBuf,
    pub target_dir: PathBuf,
    pub workers: usize,
    pub timeout: Option<Duration>,
    pub fetch_command: FetchCommandConfig,
}

impl FetchOptions {
    pub fn from_config(cfg: &LockfetchConfig, target_dir: &Path) -> Self {
        Self {
            lockfile: cfg.lockfile.clone(),
            target_dir: target_dir.to_path_buf(),
            workers: cfg.effective_workers(),
            timeout: cfg.timeout(),
            fetch_command: cfg.fetch_command.clone(),
        }
    }
}

/// Fetch every requirement in the lockfile into the target directory.
///
/// Returns `Err` only for pre-flight failures (bad target directory, missing
/// or unreadable lockfile); per-artifact failures are inside the summary.
pub fn run_fetch<P>(opts: &FetchOptions, on_progress: P) -> Result<RunSummary>
where
    P: FnMut(ProgressEvent<'_>),
{
    let start = Instant::now();
    let target_dir = preflight::prepare_target_dir(&opts.target_dir)?;
    let lock = lockfile::parse_file(&opts.lockfile)
        .with_context(|| format!("load lockfile {}", opts.lockfile.display()))?;

    let command = FetchCommand::new(&opts.fetch_command, &target_dir, &lock.global_options)
        .with_timeout(opts.timeout);
    let orchestrator = DownloadOrchestrator::new(command, opts.workers);
    let results = orchestrator.run(&lock.requirements, on_progress);

    let summary = RunSummary::from_results(results, start.elapsed());
    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        ambiguous = summary.ambiguous,
        total_bytes = summary.total_bytes,
        "run summary"
    );
    Ok(summary)
}
