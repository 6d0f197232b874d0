//! Results of checks and of a whole run.

use super::{CheckKind, RecoveredError};

/// What became of one remediation statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationStatus {
    Printed,
    Executed,
    Failed,
}

/// A generated statement and its fate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remediation {
    /// The statement, without a trailing `;`.
    pub statement: String,
    pub status: RemediationStatus,
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub kind: CheckKind,
    /// Non-conforming rows (or settings) found.
    pub findings: usize,
    pub remediations: Vec<Remediation>,
}

impl CheckReport {
    #[must_use]
    pub fn new(kind: CheckKind) -> Self {
        Self {
            kind,
            findings: 0,
            remediations: Vec::new(),
        }
    }

    /// Whether the check found nothing wrong.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings == 0
    }

    /// Generated statements, in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.remediations.iter().map(|r| r.statement.as_str())
    }
}

/// Outcome of a full audit run.
#[derive(Debug, Clone, Default)]
pub struct AuditSummary {
    pub reports: Vec<CheckReport>,
    pub errors: Vec<RecoveredError>,
}

impl AuditSummary {
    /// Report for one check, if it ran to completion.
    #[must_use]
    pub fn report(&self, kind: CheckKind) -> Option<&CheckReport> {
        self.reports.iter().find(|r| r.kind == kind)
    }

    /// Total findings across all checks.
    #[must_use]
    pub fn findings(&self) -> usize {
        self.reports.iter().map(|r| r.findings).sum()
    }

    /// Every generated statement, in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.reports.iter().flat_map(CheckReport::statements)
    }

    /// Number of remediations with the given status.
    #[must_use]
    pub fn count_status(&self, status: RemediationStatus) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.remediations)
            .filter(|r| r.status == status)
            .count()
    }
}
