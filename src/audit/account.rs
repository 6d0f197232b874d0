//! Database accounts.

use std::fmt;

use regex::Regex;

use crate::db::{DbError, Row};

/// Hosts from which a `root` account is considered local.
pub const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// A `(user, host)` pair identifying a database principal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Account {
    pub user: String,
    pub host: String,
}

impl Account {
    /// Create an account.
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// Read the `user` and `host` columns of an account table row.
    ///
    /// # Errors
    ///
    /// Returns a `DbError` if either column is missing or NULL.
    pub fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self::new(row.get("user")?, row.get("host")?))
    }

    /// Whether the user is `root`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.user == "root"
    }

    /// Whether the account is `root` reachable from a non-local host.
    #[must_use]
    pub fn is_remote_root(&self) -> bool {
        self.is_root() && !LOCAL_HOSTS.contains(&self.host.as_str())
    }

    /// Whether the user name is empty.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user.is_empty()
    }

    /// Whether the account accepts connections from any host.
    #[must_use]
    pub fn is_wildcard_host(&self) -> bool {
        self.host == "%"
    }
}

/// Formats as `'user'@'host'`, ready to splice into a statement.
impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'@'{}'",
            escape_literal(&self.user),
            escape_literal(&self.host)
        )
    }
}

/// Escape a value for use inside a single-quoted SQL string literal.
#[must_use]
pub fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "''")
}

/// Parser for grantee strings as reported by `information_schema`.
#[derive(Debug, Clone)]
pub struct GranteeParser {
    pattern: Regex,
}

impl GranteeParser {
    /// Build the parser.
    ///
    /// # Errors
    ///
    /// Returns an error if the grantee pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"^'((?:[^']|'')*)'@'((?:[^']|'')*)'$")?,
        })
    }

    /// Parse `'user'@'host'` into an account. Doubled quotes are unescaped.
    #[must_use]
    pub fn parse(&self, grantee: &str) -> Option<Account> {
        let captures = self.pattern.captures(grantee.trim())?;
        Some(Account::new(
            captures[1].replace("''", "'"),
            captures[2].replace("''", "'"),
        ))
    }
}
