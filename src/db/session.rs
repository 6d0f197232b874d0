//! The `Session` trait.

use async_trait::async_trait;

use super::{DbError, Row};

/// An open database session.
///
/// Every call is a self-contained round trip; no cursor or statement handle
/// outlives the call that created it.
#[async_trait]
pub trait Session: Send {
    /// Run a read statement and fetch all of its rows.
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, DbError>;

    /// Run a statement for its side effect.
    async fn execute(&mut self, sql: &str) -> Result<(), DbError>;

    /// Close the session. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), DbError>;
}

#[async_trait]
impl<S: Session + ?Sized> Session for &mut S {
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, DbError> {
        (**self).query(sql).await
    }

    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        (**self).execute(sql).await
    }

    async fn close(&mut self) -> Result<(), DbError> {
        (**self).close().await
    }
}
