//! Per-job fetch failure. Recorded in the job's result, never propagated.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    /// The fetch command ran and exited non-zero (includes hash mismatches).
    #[error("fetch command exited with {}", exit_label(.code))]
    NonZeroExit {
        code: Option<i32>,
        diagnostic: String,
    },

    /// The per-job timeout expired; the child was killed.
    #[error("fetch command timed out after {:?}", .after)]
    TimedOut { after: Duration, diagnostic: String },

    /// The fetch command could not be started at all.
    #[error("could not start `{program}`: {message}")]
    Spawn { program: String, message: String },

    /// The single-requirement file could not be created or written.
    #[error("could not write requirement file: {message}")]
    TempFile { message: String },

    /// The job panicked or its worker died before reporting.
    #[error("fetch job aborted: {message}")]
    Aborted { message: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

impl FetchFailure {
    /// Short machine-readable kind, used in JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchFailure::NonZeroExit { .. } => "non_zero_exit",
            FetchFailure::TimedOut { .. } => "timed_out",
            FetchFailure::Spawn { .. } => "spawn",
            FetchFailure::TempFile { .. } => "temp_file",
            FetchFailure::Aborted { .. } => "aborted",
        }
    }

    /// Text to show the user: the command's stderr when it produced any,
    /// otherwise the error message itself.
    pub fn diagnostic(&self) -> String {
        match self {
            FetchFailure::NonZeroExit { diagnostic, .. }
            | FetchFailure::TimedOut { diagnostic, .. }
                if !diagnostic.trim().is_empty() =>
            {
                diagnostic.trim_end().to_string()
            }
            other => other.to_string(),
        }
    }
}
