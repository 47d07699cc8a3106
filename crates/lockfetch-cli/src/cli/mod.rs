//! CLI for lockfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lockfetch_core::config::{self, LockfetchConfig};
use std::path::PathBuf;

use commands::{run_fetch, run_verify, FetchArgs};

/// Top-level CLI for lockfetch.
#[derive(Debug, Parser)]
#[command(name = "lockfetch")]
#[command(
    about = "Fetch the hash-pinned artifacts of a lockfile in parallel",
    long_about = None,
    after_help = "A subcommand is required: the plain download is `lockfetch fetch --target-dir DIR`, \
not a bare `--target-dir DIR`."
)]
pub struct Cli {
    /// Config file to use instead of ~/.config/lockfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every requirement of the lockfile into the target directory.
    Fetch {
        /// Directory the artifacts are downloaded into (created if missing).
        #[arg(long, value_name = "DIR")]
        target_dir: PathBuf,

        /// Lockfile to read (default from config: third_party/python/requirements.txt).
        #[arg(long, value_name = "PATH")]
        lockfile: Option<PathBuf>,

        /// Run at most N fetches concurrently (default: available parallelism).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Kill a single fetch after SECS seconds (at least 1) and record it as failed.
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Also write the run summary as JSON to PATH.
        #[arg(long, value_name = "PATH")]
        json_report: Option<PathBuf>,
    },

    /// Re-hash artifacts in the target directory against the lockfile's sha256 pins.
    Verify {
        /// Directory holding previously fetched artifacts.
        #[arg(long, value_name = "DIR")]
        target_dir: PathBuf,

        /// Lockfile to read (default from config).
        #[arg(long, value_name = "PATH")]
        lockfile: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<LockfetchConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    /// Parse argv, run the command, and return the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let mut cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        let code = match cli.command {
            CliCommand::Fetch {
                target_dir,
                lockfile,
                jobs,
                timeout,
                json_report,
            } => {
                if let Some(lockfile) = lockfile {
                    cfg.lockfile = lockfile;
                }
                if jobs.is_some() {
                    cfg.workers = jobs;
                }
                if timeout.is_some() {
                    cfg.timeout_secs = timeout;
                }
                run_fetch(
                    &cfg,
                    &FetchArgs {
                        target_dir,
                        json_report,
                    },
                )?
            }
            CliCommand::Verify {
                target_dir,
                lockfile,
            } => {
                if let Some(lockfile) = lockfile {
                    cfg.lockfile = lockfile;
                }
                run_verify(&cfg, &target_dir)?
            }
        };

        Ok(code)
    }
}

#[cfg(test)]
mod tests;
