//! Machine-readable run report (`--json-report`).

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use super::RunSummary;
use crate::result::FetchOutcome;

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub ambiguous: usize,
    pub total_bytes: u64,
    pub elapsed_secs: f64,
    pub exit_code: i32,
    pub artifacts: Vec<JsonArtifact>,
}

#[derive(Debug, Serialize)]
pub struct JsonArtifact {
    pub name: String,
    pub version: String,
    pub success: bool,
    pub size: u64,
    pub elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&RunSummary> for JsonReport {
    fn from(summary: &RunSummary) -> Self {
        let mut artifacts: Vec<JsonArtifact> = summary
            .results()
            .iter()
            .map(|r| JsonArtifact {
                name: r.name.clone(),
                version: r.version.clone(),
                success: r.is_success(),
                size: r.size(),
                elapsed_secs: r.elapsed.as_secs_f64(),
                path: match &r.outcome {
                    FetchOutcome::Fetched { path, .. } => Some(path.display().to_string()),
                    _ => None,
                },
                error_kind: r.error().map(|e| e.kind()),
                error: r.error().map(|e| e.diagnostic()),
            })
            .collect();
        artifacts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));

        JsonReport {
            total: summary.total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            ambiguous: summary.ambiguous,
            total_bytes: summary.total_bytes,
            elapsed_secs: summary.elapsed.as_secs_f64(),
            exit_code: summary.status().exit_code(),
            artifacts,
        }
    }
}

/// Write the summary as pretty JSON to `path`.
pub fn write_json(summary: &RunSummary, path: &Path) -> Result<()> {
    let report = JsonReport::from(summary);
    let data = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, data).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
