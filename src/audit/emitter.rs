//! Print or execute remediation statements.

use std::io::{self, Write};

use crate::db::{DbError, Session};

/// What happened to a remediation statement.
#[derive(Debug)]
pub enum EmitOutcome {
    /// Written to the report.
    Printed,
    /// Run against the server.
    Executed,
    /// Run against the server and rejected.
    Failed(DbError),
}

/// Sends each generated statement to the report or to the server.
#[derive(Debug, Clone, Copy)]
pub struct StatementEmitter {
    print_only: bool,
}

impl StatementEmitter {
    #[must_use]
    pub fn new(print_only: bool) -> Self {
        Self { print_only }
    }

    #[must_use]
    pub fn print_only(&self) -> bool {
        self.print_only
    }

    /// Print `statement` followed by `;`, or execute it.
    ///
    /// An execution failure is returned as `EmitOutcome::Failed`; only a
    /// failure to write the report is an error.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the statement cannot be printed.
    pub async fn emit(
        &self,
        session: &mut dyn Session,
        out: &mut dyn Write,
        statement: &str,
    ) -> io::Result<EmitOutcome> {
        if self.print_only {
            writeln!(out, "{statement};")?;
            return Ok(EmitOutcome::Printed);
        }

        match session.execute(statement).await {
            Ok(()) => {
                tracing::info!(statement = %statement, "Executed remediation");
                Ok(EmitOutcome::Executed)
            }
            Err(e) => {
                tracing::warn!(statement = %statement, error = %e, "Remediation failed");
                Ok(EmitOutcome::Failed(e))
            }
        }
    }
}
