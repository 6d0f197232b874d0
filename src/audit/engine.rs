//! Runs the checks in order against one session.

use std::io::Write;

use crate::config::AuditOptions;
use crate::db::Session;

use super::checks::run_check;
use super::{AuditError, AuditSummary, CheckContext, CheckKind, RecoveredError};

/// The ordered list of checks and the options they run under.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    options: AuditOptions,
    checks: Vec<CheckKind>,
}

impl AuditEngine {
    /// An engine running every check not listed in `options.skip`.
    #[must_use]
    pub fn new(options: AuditOptions) -> Self {
        let checks = CheckKind::ALL
            .into_iter()
            .filter(|kind| !options.skip.contains(kind))
            .collect();
        Self { options, checks }
    }

    /// Checks that will run, in order.
    #[must_use]
    pub fn checks(&self) -> &[CheckKind] {
        &self.checks
    }

    #[must_use]
    pub fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// Run every check, writing the report to `out`.
    ///
    /// Statement and row failures are reported inline and collected in the
    /// summary. A failing check ends the run unless `keep_going` is set.
    ///
    /// # Errors
    ///
    /// Returns the first check failure (without `keep_going`) or any failure
    /// to write the report.
    pub async fn run(
        &self,
        session: &mut dyn Session,
        out: &mut dyn Write,
    ) -> Result<AuditSummary, AuditError> {
        let mut ctx = CheckContext::new(out, &self.options);
        let mut reports = Vec::with_capacity(self.checks.len());

        for &kind in &self.checks {
            tracing::debug!(check = %kind, "Running check");
            match run_check(kind, session, &mut ctx).await {
                Ok(report) => {
                    tracing::debug!(
                        check = %kind,
                        findings = report.findings,
                        statements = report.remediations.len(),
                        "Check finished"
                    );
                    reports.push(report);
                }
                Err(AuditError::Output(e)) => return Err(AuditError::Output(e)),
                Err(e) if self.options.keep_going => {
                    tracing::warn!(check = %kind, error = %e, "Check failed, continuing");
                    ctx.report_error(RecoveredError::check(kind, &e))?;
                }
                Err(e) => return Err(e),
            }
        }
        ctx.flush()?;

        Ok(AuditSummary {
            reports,
            errors: ctx.into_errors(),
        })
    }

    /// Run the audit and close the session, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run. A failure to close is logged.
    pub async fn run_and_close<S: Session>(
        &self,
        mut session: S,
        out: &mut dyn Write,
    ) -> Result<AuditSummary, AuditError> {
        let result = self.run(&mut session, out).await;
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Failed to close connection");
        }
        result
    }
}
