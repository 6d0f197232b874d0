//! Audit error types.

use std::fmt;

use crate::db::DbError;

use super::CheckKind;

/// Errors that end an audit run (or, with `keep_going`, a single check).
#[derive(thiserror::Error, Debug)]
pub enum AuditError {
    /// A diagnostic query failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The report could not be written.
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    /// A single-row query returned nothing.
    #[error("{check}: query returned no rows")]
    MissingRow { check: CheckKind },

    /// A server variable held a value the check cannot interpret.
    #[error("{check}: unexpected value {value:?}")]
    UnexpectedValue { check: CheckKind, value: String },

    /// The account table has no usable password column.
    #[error(
        "{check}: mysql.user has no column {column}; set --password-column \
         (authentication_string on MySQL 5.7 and later)"
    )]
    PasswordColumn { check: CheckKind, column: String },

    /// The grantee pattern failed to compile.
    #[error("Invalid grantee pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl AuditError {
    /// The check named by the error itself, if any.
    #[must_use]
    pub fn check(&self) -> Option<CheckKind> {
        match self {
            Self::MissingRow { check }
            | Self::UnexpectedValue { check, .. }
            | Self::PasswordColumn { check, .. } => Some(*check),
            _ => None,
        }
    }
}

/// Where a recovered failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryKind {
    /// A remediation statement failed to execute.
    Statement,
    /// One result row could not be processed.
    Row,
    /// A whole check failed and the run carried on.
    Check,
}

/// A failure that was reported and stepped over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredError {
    pub check: CheckKind,
    pub kind: RecoveryKind,
    pub message: String,
}

impl RecoveredError {
    /// A statement that failed to execute.
    #[must_use]
    pub fn statement(check: CheckKind, statement: &str) -> Self {
        Self {
            check,
            kind: RecoveryKind::Statement,
            message: format!("error executing: {statement};"),
        }
    }

    /// A row that could not be processed.
    pub fn row(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            kind: RecoveryKind::Row,
            message: message.into(),
        }
    }

    /// A check that failed as a whole.
    #[must_use]
    pub fn check(check: CheckKind, error: &AuditError) -> Self {
        Self {
            check,
            kind: RecoveryKind::Check,
            message: match error.check() {
                Some(_) => error.to_string(),
                None => format!("{check}: {error}"),
            },
        }
    }
}

impl fmt::Display for RecoveredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Collects recovered failures in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    errors: Vec<RecoveredError>,
}

impl ErrorSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn record(&mut self, error: RecoveredError) {
        self.errors.push(error);
    }

    /// Failures recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[RecoveredError] {
        &self.errors
    }

    /// Number of failures recorded for one check.
    #[must_use]
    pub fn count_for(&self, check: CheckKind) -> usize {
        self.errors.iter().filter(|e| e.check == check).count()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<RecoveredError> {
        self.errors
    }
}
