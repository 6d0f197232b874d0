//! Per-run narration, statement emission and error collection.

use std::io::{self, Write};

use crate::config::AuditOptions;
use crate::db::Session;

use super::emitter::{EmitOutcome, StatementEmitter};
use super::{CheckKind, ErrorSink, RecoveredError, Remediation, RemediationStatus};

/// Everything a check needs besides the session.
///
/// Narration lines are prefixed `-- ` and only written in verbose mode;
/// error lines are prefixed `-- ERROR: ` and always written.
pub struct CheckContext<'a> {
    out: &'a mut dyn Write,
    options: &'a AuditOptions,
    emitter: StatementEmitter,
    errors: ErrorSink,
}

impl<'a> CheckContext<'a> {
    pub fn new(out: &'a mut dyn Write, options: &'a AuditOptions) -> Self {
        Self {
            out,
            options,
            emitter: StatementEmitter::new(options.print_only),
            errors: ErrorSink::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &AuditOptions {
        self.options
    }

    /// Write a narration line.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the report cannot be written.
    pub fn verbose(&mut self, message: &str) -> io::Result<()> {
        if self.options.verbose {
            writeln!(self.out, "-- {message}")?;
        }
        Ok(())
    }

    /// Write a blank narration line, the topic, and an underline.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the report cannot be written.
    pub fn topic(&mut self, topic: &str) -> io::Result<()> {
        self.verbose("")?;
        self.verbose(topic)?;
        self.verbose(&"-".repeat(topic.len()))
    }

    /// Narrate a finding that is followed by recommended statements.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the report cannot be written.
    pub fn recommend(&mut self, message: &str) -> io::Result<()> {
        self.verbose(&format!("{message}. Recommended actions:"))
    }

    /// Write an error line and record the failure.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the report cannot be written.
    pub fn report_error(&mut self, error: RecoveredError) -> io::Result<()> {
        writeln!(self.out, "-- ERROR: {error}")?;
        self.errors.record(error);
        Ok(())
    }

    /// Print or execute a remediation statement.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the report cannot be written. A statement
    /// rejected by the server is reported and recorded, not returned.
    pub async fn emit(
        &mut self,
        session: &mut dyn Session,
        check: CheckKind,
        statement: String,
    ) -> io::Result<Remediation> {
        let emitter = self.emitter;
        let status = match emitter.emit(session, &mut *self.out, &statement).await? {
            EmitOutcome::Printed => RemediationStatus::Printed,
            EmitOutcome::Executed => RemediationStatus::Executed,
            EmitOutcome::Failed(_) => {
                self.report_error(RecoveredError::statement(check, &statement))?;
                RemediationStatus::Failed
            }
        };
        Ok(Remediation { statement, status })
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    /// Flush the report writer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if flushing fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<RecoveredError> {
        self.errors.into_inner()
    }
}
