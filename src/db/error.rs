//! Database error types.

/// Errors raised by a [`Session`](super::Session).
#[derive(thiserror::Error, Debug)]
pub enum DbError {
    /// Failed to open the connection.
    #[error("Failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// The driver failed while running a statement.
    #[error("Query failed: {sql}: {source}")]
    Query {
        sql: String,
        #[source]
        source: sqlx::Error,
    },

    /// The server (or a scripted session) refused the statement.
    #[error("Query failed: {sql}: {message}")]
    Rejected { sql: String, message: String },

    /// A row has no column with the requested name or position.
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// A column that must carry a value is NULL.
    #[error("Unexpected NULL in column {0}")]
    NullValue(String),

    /// The session was used after it was closed.
    #[error("Connection already closed")]
    Closed,
}

/// Server message for a query naming a column the table lacks (ER_BAD_FIELD_ERROR).
const UNKNOWN_COLUMN: &str = "Unknown column";

/// SQLSTATE for an unknown column.
const UNKNOWN_COLUMN_STATE: &str = "42S22";

impl DbError {
    /// Whether the server rejected a query for naming a missing column.
    #[must_use]
    pub fn is_unknown_column(&self) -> bool {
        match self {
            Self::Query {
                source: sqlx::Error::Database(db),
                ..
            } => {
                db.code().as_deref() == Some(UNKNOWN_COLUMN_STATE)
                    || db.message().contains(UNKNOWN_COLUMN)
            }
            Self::Rejected { message, .. } => message.contains(UNKNOWN_COLUMN),
            _ => false,
        }
    }
}
