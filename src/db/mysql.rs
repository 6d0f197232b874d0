//! `Session` over a live MySQL connection.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Executor, Row as _};

use super::{DbError, Row, Session};
use crate::config::ConnectionSettings;

/// A single MySQL connection.
///
/// Statements are sent as plain `&str` without arguments, which keeps them on
/// the text protocol: `SHOW GRANTS`, `RENAME USER` and friends are not all
/// preparable.
pub struct MySqlSession {
    conn: Option<MySqlConnection>,
}

impl MySqlSession {
    /// Open a connection using the resolved settings.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connect` if the server cannot be reached or rejects
    /// the credentials.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, DbError> {
        let mut options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user);
        if let Some(password) = settings.password.as_deref() {
            options = options.password(password);
        }
        if let Some(socket) = settings.effective_socket() {
            options = options.socket(socket);
        }

        tracing::debug!(server = %settings.target(), user = %settings.user, "Connecting");
        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(|source| DbError::Connect {
                target: settings.target(),
                source,
            })?;
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&mut self) -> Result<&mut MySqlConnection, DbError> {
        self.conn.as_mut().ok_or(DbError::Closed)
    }
}

#[async_trait]
impl Session for MySqlSession {
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, DbError> {
        let conn = self.conn()?;
        let rows = Executor::fetch_all(&mut *conn, sql)
            .await
            .map_err(|source| DbError::Query {
                sql: sql.to_string(),
                source,
            })?;
        Ok(rows.iter().map(convert_row).collect())
    }

    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        let conn = self.conn()?;
        Executor::execute(&mut *conn, sql)
            .await
            .map_err(|source| DbError::Query {
                sql: sql.to_string(),
                source,
            })?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DbError> {
        if let Some(conn) = self.conn.take() {
            tracing::debug!("Closing connection");
            conn.close().await.map_err(|source| DbError::Query {
                sql: "COM_QUIT".to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

fn convert_row(row: &MySqlRow) -> Row {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.push(column.name(), decode_text(row, index));
    }
    out
}

/// Read a column as text whatever its wire type.
///
/// Account tables mix `CHAR ... BINARY`, blobs and integers depending on the
/// server version.
fn decode_text(row: &MySqlRow, index: usize) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value;
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
        return value.map(|v| v.to_string());
    }
    tracing::warn!(column = index, "Could not decode column as text");
    None
}
