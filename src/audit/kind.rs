//! Identifiers for the individual audit checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the audit checks, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// `root` accounts reachable from other hosts.
    RemoteRoot,
    /// Accounts with an empty user name.
    AnonymousUser,
    /// Accounts whose host is `%`.
    WildcardHost,
    /// Accounts without a password.
    EmptyPassword,
    /// Different users sharing one password hash.
    SharedPassword,
    /// Non-root accounts holding `ALL PRIVILEGES ON *.*`.
    GlobalGrants,
    /// Non-root accounts holding admin privileges.
    AdminPrivileges,
    /// Global `sql_mode` lacking `NO_AUTO_CREATE_USER`.
    SqlMode,
    /// Legacy password hashing enabled.
    OldPasswords,
    /// TCP networking enabled.
    SkipNetworking,
    /// Presence of the `test` database.
    TestDatabase,
}

impl CheckKind {
    /// Every check in run order: accounts, then privileges, then server settings.
    pub const ALL: [CheckKind; 11] = [
        Self::RemoteRoot,
        Self::AnonymousUser,
        Self::WildcardHost,
        Self::EmptyPassword,
        Self::SharedPassword,
        Self::GlobalGrants,
        Self::AdminPrivileges,
        Self::SqlMode,
        Self::OldPasswords,
        Self::SkipNetworking,
        Self::TestDatabase,
    ];

    /// Returns the name used in config files and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteRoot => "remote_root",
            Self::AnonymousUser => "anonymous_user",
            Self::WildcardHost => "wildcard_host",
            Self::EmptyPassword => "empty_password",
            Self::SharedPassword => "shared_password",
            Self::GlobalGrants => "global_grants",
            Self::AdminPrivileges => "admin_privileges",
            Self::SqlMode => "sql_mode",
            Self::OldPasswords => "old_passwords",
            Self::SkipNetworking => "skip_networking",
            Self::TestDatabase => "test_database",
        }
    }

    /// Heading narrated before the check runs.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::RemoteRoot => "Looking for non local 'root' accounts",
            Self::AnonymousUser => "Looking for anonymous user accounts",
            Self::WildcardHost => "Looking for accounts accessible from any host",
            Self::EmptyPassword => "Looking for accounts with empty passwords",
            Self::SharedPassword => "Looking for accounts with identical (non empty) passwords",
            Self::GlobalGrants => "Looking for (non root) accounts with all privileges",
            Self::AdminPrivileges => "Looking for (non-root) accounts with admin privileges",
            Self::SqlMode => "Checking global sql_mode",
            Self::OldPasswords => "Checking old_passwords setting",
            Self::SkipNetworking => "Checking networking",
            Self::TestDatabase => "Checking for `test` database existence",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown check '{s}'"))
    }
}
