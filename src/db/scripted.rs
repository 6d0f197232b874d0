//! In-memory `Session` that replays scripted answers.
//!
//! This is a test double. It is public so the integration tests under
//! `tests/` and downstream crates can drive checks without a server; the
//! binary never uses it.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{DbError, Row, Session};

#[derive(Debug, Clone)]
enum Answer {
    Rows(Vec<Row>),
    Fail(String),
}

/// A session answering queries from a script keyed by exact SQL text.
///
/// Queries that are not scripted fail. Statements sent through
/// [`Session::execute`] are recorded and succeed unless scripted to fail.
///
/// Intended for tests only: it never talks to MySQL and its failures are
/// reported as [`DbError::Rejected`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedSession {
    answers: HashMap<String, Answer>,
    queries: Vec<String>,
    executed: Vec<String>,
    close_count: usize,
}

impl ScriptedSession {
    /// Create a session with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with `rows`.
    #[must_use]
    pub fn with_rows(mut self, sql: impl Into<String>, rows: Vec<Row>) -> Self {
        self.answers.insert(sql.into(), Answer::Rows(rows));
        self
    }

    /// Make `sql` fail with `message`, whether queried or executed.
    #[must_use]
    pub fn with_failure(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.answers.insert(sql.into(), Answer::Fail(message.into()));
        self
    }

    /// Queries received so far, in order.
    #[must_use]
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Statements executed so far, in order.
    #[must_use]
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    /// How many times `close` was called.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.close_count
    }

    fn ensure_open(&self) -> Result<(), DbError> {
        if self.close_count > 0 {
            return Err(DbError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, DbError> {
        self.ensure_open()?;
        self.queries.push(sql.to_string());
        match self.answers.get(sql) {
            Some(Answer::Rows(rows)) => Ok(rows.clone()),
            Some(Answer::Fail(message)) => Err(DbError::Rejected {
                sql: sql.to_string(),
                message: message.clone(),
            }),
            None => Err(DbError::Rejected {
                sql: sql.to_string(),
                message: "no scripted answer".to_string(),
            }),
        }
    }

    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        self.ensure_open()?;
        self.executed.push(sql.to_string());
        match self.answers.get(sql) {
            Some(Answer::Fail(message)) => Err(DbError::Rejected {
                sql: sql.to_string(),
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }

    async fn close(&mut self) -> Result<(), DbError> {
        self.close_count += 1;
        Ok(())
    }
}
