//! `lockfetch verify` – re-hash fetched artifacts against the lockfile.

use anyhow::{Context, Result};
use lockfetch_core::config::LockfetchConfig;
use lockfetch_core::lockfile;
use lockfetch_core::verify::{self, VerifyStatus};
use std::path::Path;

pub fn run_verify(cfg: &LockfetchConfig, target_dir: &Path) -> Result<i32> {
    if !target_dir.is_dir() {
        anyhow::bail!("target directory {} does not exist", target_dir.display());
    }
    let lock = lockfile::parse_file(&cfg.lockfile)
        .with_context(|| format!("load lockfile {}", cfg.lockfile.display()))?;
    let report = verify::verify_dir(&lock, target_dir);

    for entry in &report.entries {
        let label = format!("{}=={}", entry.name, entry.version);
        match &entry.status {
            VerifyStatus::Verified { .. } => println!("  ok        {}", label),
            VerifyStatus::NoHashes => println!("  unpinned  {} (no sha256 hash declared)", label),
            VerifyStatus::Missing => println!("  MISSING   {}", label),
            VerifyStatus::Mismatch { path, actual } => println!(
                "  MISMATCH  {}: {} has sha256 {}",
                label,
                path.display(),
                actual
            ),
            VerifyStatus::Unreadable { path, message } => {
                println!("  ERROR     {}: {}: {}", label, path.display(), message)
            }
        }
    }

    let problems = report.problems().count();
    println!();
    println!(
        "{} verified, {} problem(s), {} total",
        report.verified_count(),
        problems,
        report.entries.len()
    );
    Ok(report.exit_code())
}
