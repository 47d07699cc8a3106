//! Single-artifact fetch: one requirement, one temp requirements file, one
//! invocation of the external fetch command, one [`FetchResult`].
//!
//! The fetch command's argv surface cannot carry `--hash` directives, so the
//! full requirement line goes into a throwaway requirements file and the
//! command is pointed at it with `-r`. The file lives exactly as long as the
//! invocation.

mod error;
mod invoke;

pub use error::FetchFailure;

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::FetchCommandConfig;
use crate::locator;
use crate::lockfile::RequirementSpec;
use crate::result::{FetchOutcome, FetchResult};

/// Shared, immutable base command for every job in a run.
#[derive(Debug, Clone)]
pub struct FetchCommand {
    program: String,
    base_args: Vec<String>,
    target_dir: PathBuf,
    global_options: Vec<String>,
    timeout: Option<Duration>,
}

impl FetchCommand {
    pub fn new(cfg: &FetchCommandConfig, target_dir: &Path, global_options: &[String]) -> Self {
        Self {
            program: cfg.program.clone(),
            base_args: cfg.args.clone(),
            target_dir: target_dir.to_path_buf(),
            global_options: global_options.to_vec(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Full argument list for one job reading requirements from `requirements_file`.
    pub fn args_for(&self, requirements_file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.base_args.iter().map(OsString::from).collect();
        args.push("--dest".into());
        args.push(self.target_dir.as_os_str().to_os_string());
        args.push("--no-deps".into());
        args.push("--require-hashes".into());
        args.extend(self.global_options.iter().map(OsString::from));
        args.push("-r".into());
        args.push(requirements_file.as_os_str().to_os_string());
        args
    }
}

/// Fetch one requirement into the target directory. Never fails: every
/// error is captured in the returned result.
pub fn fetch_one(cmd: &FetchCommand, spec: &RequirementSpec) -> FetchResult {
    let start = Instant::now();
    let outcome = match fetch_with_temp_file(cmd, spec) {
        Ok(()) => match locator::locate(cmd.target_dir(), spec.name(), spec.version()) {
            Some(found) => FetchOutcome::Fetched {
                path: found.path,
                size: found.size,
            },
            None => {
                tracing::warn!(
                    name = spec.name(),
                    version = spec.version(),
                    dir = %cmd.target_dir().display(),
                    "fetch succeeded but no matching artifact found; size unknown"
                );
                FetchOutcome::Ambiguous
            }
        },
        Err(failure) => {
            tracing::debug!(
                name = spec.name(),
                version = spec.version(),
                kind = failure.kind(),
                "fetch failed: {}",
                failure
            );
            FetchOutcome::Failed(failure)
        }
    };
    FetchResult::new(spec, outcome, start.elapsed())
}

fn fetch_with_temp_file(cmd: &FetchCommand, spec: &RequirementSpec) -> Result<(), FetchFailure> {
    let temp_err = |e: std::io::Error| FetchFailure::TempFile {
        message: e.to_string(),
    };

    let mut file = tempfile::Builder::new()
        .prefix("lockfetch-req-")
        .suffix(".txt")
        .tempfile()
        .map_err(temp_err)?;
    writeln!(file, "{}", spec.source()).map_err(temp_err)?;
    file.flush().map_err(temp_err)?;

    // Close our handle but keep the path; dropping it removes the file on every exit path.
    let req_path = file.into_temp_path();
    let args = cmd.args_for(&req_path);
    tracing::debug!(name = spec.name(), file = %req_path.display(), "invoking fetch command");
    let result = invoke::run_command(cmd.program(), &args, cmd.timeout);

    if let Err(e) = req_path.close() {
        tracing::warn!(error = %e, "could not remove temporary requirements file");
    }
    result
}
