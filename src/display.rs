//! Colored end-of-run summary.
//!
//! The report itself goes to stdout untouched so it can be piped into a
//! client; the summary goes to stderr.

use std::io::{self, Write};

use chrono::Utc;
use owo_colors::OwoColorize;

use crate::audit::{AuditSummary, RemediationStatus};

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// One-line plain summary of a run.
#[must_use]
pub fn summary_line(summary: &AuditSummary) -> String {
    format!(
        "{} checks, {} findings, {} statements ({} printed, {} executed, {} failed), {} errors",
        summary.reports.len(),
        summary.findings(),
        summary.statements().count(),
        summary.count_status(RemediationStatus::Printed),
        summary.count_status(RemediationStatus::Executed),
        summary.count_status(RemediationStatus::Failed),
        summary.errors.len()
    )
}

/// Print the run summary to stderr.
pub fn print_summary(summary: &AuditSummary) {
    let mut stderr = io::stderr();
    let tag = if summary.errors.is_empty() && summary.findings() == 0 {
        "[CLEAN]".green().bold().to_string()
    } else if summary.errors.is_empty() {
        "[FINDINGS]".yellow().bold().to_string()
    } else {
        "[ERRORS]".red().bold().to_string()
    };
    let _ = writeln!(
        stderr,
        "{} {} {}",
        timestamp().dimmed(),
        tag,
        summary_line(summary)
    );
    for report in summary.reports.iter().filter(|r| !r.is_clean()) {
        let _ = writeln!(
            stderr,
            "  {} {}",
            report.kind.as_str().cyan(),
            format!("{} finding(s)", report.findings).dimmed()
        );
    }
    let _ = stderr.flush();
}
