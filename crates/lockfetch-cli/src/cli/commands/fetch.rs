//! `lockfetch fetch` – download all lockfile requirements into a directory.

use anyhow::Result;
use lockfetch_core::config::LockfetchConfig;
use lockfetch_core::report;
use lockfetch_core::run::{self, FetchOptions};
use std::path::PathBuf;

/// Per-invocation arguments that have no config-file counterpart.
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub target_dir: PathBuf,
    pub json_report: Option<PathBuf>,
}

/// Run the fetch and print live progress plus the final summary.
/// Returns the exit code: 0 iff every requirement was fetched.
pub fn run_fetch(cfg: &LockfetchConfig, args: &FetchArgs) -> Result<i32> {
    let opts = FetchOptions::from_config(cfg, &args.target_dir);
    println!(
        "Fetching {} into {} with up to {} workers",
        opts.lockfile.display(),
        opts.target_dir.display(),
        opts.workers
    );

    let summary = run::run_fetch(&opts, |ev| println!("  {}", ev.line()))?;

    println!();
    print!("{}", report::render(&summary, cfg.diagnostic_tail_chars));

    if let Some(path) = &args.json_report {
        report::write_json(&summary, path)?;
        tracing::info!("wrote JSON report to {}", path.display());
    }

    let status = summary.status();
    if !status.is_success() {
        tracing::warn!(failed = summary.failed, "run finished with failures");
    }
    Ok(status.exit_code())
}
