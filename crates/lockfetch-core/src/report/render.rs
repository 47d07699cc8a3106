//! Plain-text rendering of the final summary block.

use std::fmt::Write;

use super::RunSummary;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Human-readable byte count (binary units, one decimal).
pub fn format_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < MIB {
        format!("{:.1} KiB", b / KIB)
    } else if b < GIB {
        format!("{:.1} MiB", b / MIB)
    } else {
        format!("{:.2} GiB", b / GIB)
    }
}

/// Last `max` characters of `text` (trimmed), prefixed with `...` when cut.
/// Fetch-command diagnostics put the actual error at the end.
///
/// The result is never longer than `max` characters plus the marker, even
/// when `max` is 0.
pub fn tail_chars(text: &str, max: usize) -> String {
    let text = text.trim();
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let start = text
        .char_indices()
        .nth(count - max)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    format!("...{}", &text[start..])
}

/// Render the summary block shown after a run.
pub fn render(summary: &RunSummary, diagnostic_tail: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  total:      {}", summary.total);
    if summary.ambiguous > 0 {
        let _ = writeln!(
            out,
            "  succeeded:  {} ({} ambiguous)",
            summary.succeeded, summary.ambiguous
        );
    } else {
        let _ = writeln!(out, "  succeeded:  {}", summary.succeeded);
    }
    let _ = writeln!(out, "  failed:     {}", summary.failed);
    let _ = writeln!(out, "  downloaded: {}", format_bytes(summary.total_bytes));
    let _ = writeln!(out, "  elapsed:    {:.1}s", summary.elapsed.as_secs_f64());

    let ambiguous = summary.ambiguous_results();
    if !ambiguous.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Fetched but not found on disk (size unknown):");
        for r in ambiguous {
            let _ = writeln!(out, "  - {}=={}", r.name, r.version);
        }
    }

    let failures = summary.failures();
    if !failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failures:");
        for r in failures {
            let Some(err) = r.error() else { continue };
            let _ = writeln!(out, "  - {}=={}: {}", r.name, r.version, err);
            for line in tail_chars(&err.diagnostic(), diagnostic_tail).lines() {
                let _ = writeln!(out, "      {}", line);
            }
        }
    }

    out
}
