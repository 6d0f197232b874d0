//! Configuration types.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audit::CheckKind;

/// Column of `mysql.user` holding the password hash on pre-5.7 servers.
pub const DEFAULT_PASSWORD_COLUMN: &str = "password";

/// Column tried when the default one is missing (MySQL 5.7 and later).
pub const FALLBACK_PASSWORD_COLUMN: &str = "authentication_string";

/// Socket used for `localhost` connections when none is configured.
pub const DEFAULT_SOCKET: &str = "/var/run/mysqld/mysql.sock";

/// Options controlling a single audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditOptions {
    /// Print `-- ` narration around the statements.
    pub verbose: bool,
    /// Print remediation statements instead of executing them.
    pub print_only: bool,
    /// Record a failing check and carry on with the next one.
    pub keep_going: bool,
    /// Account table column holding the password hash.
    pub password_column: String,
    /// Checks left out of the run.
    pub skip: BTreeSet<CheckKind>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            print_only: false,
            keep_going: false,
            password_column: DEFAULT_PASSWORD_COLUMN.to_string(),
            skip: BTreeSet::new(),
        }
    }
}

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    /// Unix socket, only used when `host` is `localhost`.
    pub socket: Option<PathBuf>,
    /// MySQL option file overriding every other connection setting.
    pub defaults_file: Option<PathBuf>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: String::new(),
            password: None,
            socket: Some(PathBuf::from(DEFAULT_SOCKET)),
            defaults_file: None,
        }
    }
}

impl ConnectionSettings {
    /// The socket to connect through, if the host is `localhost`.
    #[must_use]
    pub fn effective_socket(&self) -> Option<&Path> {
        if self.host == "localhost" {
            self.socket.as_deref()
        } else {
            None
        }
    }

    /// Human-readable connection target, without credentials.
    #[must_use]
    pub fn target(&self) -> String {
        match self.effective_socket() {
            Some(socket) => format!("{} ({})", self.host, socket.display()),
            None => format!("{}:{}", self.host, self.port),
        }
    }
}

/// Contents of a `.mysql-audit.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub connection: ConnectionSettings,
    pub audit: AuditOptions,
}
