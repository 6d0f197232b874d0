//! Diagnostic query text.

use super::account::Account;
use super::privileges::{in_list, ADMIN};

/// Every account, in a stable order.
pub const ACCOUNTS: &str = "SELECT user, host FROM mysql.user ORDER BY user, host";

/// Global `sql_mode`.
pub const SQL_MODE: &str = "SELECT @@GLOBAL.sql_mode AS sql_mode";

/// Global `old_passwords`.
pub const OLD_PASSWORDS: &str = "SELECT @@GLOBAL.old_passwords AS old_passwords";

/// The `skip_networking` flag.
pub const SKIP_NETWORKING: &str = "SHOW GLOBAL VARIABLES LIKE 'skip_networking'";

/// Database names.
pub const DATABASES: &str = "SHOW DATABASES";

/// Every account with its password hash, read from `column`.
///
/// `column` must already be validated as an identifier.
#[must_use]
pub fn accounts_with_password(column: &str) -> String {
    format!("SELECT user, host, {column} AS password FROM mysql.user ORDER BY user, host")
}

/// Grants held by one account.
#[must_use]
pub fn show_grants(account: &Account) -> String {
    format!("SHOW GRANTS FOR {account}")
}

/// Grantees holding at least one admin privilege, with those privileges.
#[must_use]
pub fn admin_grantees() -> String {
    format!(
        "SELECT GRANTEE, GROUP_CONCAT(PRIVILEGE_TYPE) AS privileges \
         FROM information_schema.USER_PRIVILEGES \
         WHERE PRIVILEGE_TYPE IN {} \
         GROUP BY GRANTEE ORDER BY GRANTEE",
        in_list(&ADMIN)
    )
}
