//! Account table checks.

use std::collections::{BTreeMap, BTreeSet};

use crate::audit::account::Account;
use crate::audit::queries;
use crate::audit::{AuditError, CheckContext, CheckKind, CheckReport, RecoveredError};
use crate::config::{DEFAULT_PASSWORD_COLUMN, FALLBACK_PASSWORD_COLUMN};
use crate::db::{DbError, Row, Session};

/// Placeholder for a password the operator has to choose.
const PASSWORD_PLACEHOLDER: &str = "<some password>";

/// Placeholder for a host the operator has to choose.
const HOST_PLACEHOLDER: &str = "<specific host>";

/// Characters of a password hash shown when grouping.
const FINGERPRINT_LEN: usize = 5;

/// A check that flags individual rows of the account list.
struct AccountRule {
    kind: CheckKind,
    flags: fn(&Account) -> bool,
    found: &'static str,
    clean: &'static str,
    remedy: fn(&Account) -> String,
}

fn drop_user(account: &Account) -> String {
    format!("DROP USER {account}")
}

fn rename_to_placeholder(account: &Account) -> String {
    let target = Account::new(account.user.clone(), HOST_PLACEHOLDER);
    format!("RENAME USER {account} TO {target}")
}

fn set_placeholder_password(account: &Account) -> String {
    format!("SET PASSWORD FOR {account} = PASSWORD('{PASSWORD_PLACEHOLDER}')")
}

pub(super) async fn remote_root(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let rule = AccountRule {
        kind: CheckKind::RemoteRoot,
        flags: Account::is_remote_root,
        found: "non local 'root' accounts",
        clean: "No remote 'root' accounts found",
        remedy: drop_user,
    };
    scan_accounts(session, ctx, &rule).await
}

pub(super) async fn anonymous_user(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let rule = AccountRule {
        kind: CheckKind::AnonymousUser,
        flags: Account::is_anonymous,
        found: "anonymous accounts",
        clean: "No anonymous accounts found",
        remedy: drop_user,
    };
    scan_accounts(session, ctx, &rule).await
}

pub(super) async fn wildcard_host(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let rule = AccountRule {
        kind: CheckKind::WildcardHost,
        flags: Account::is_wildcard_host,
        found: "accounts accessible from any host",
        clean: "No wildcard hosts found",
        remedy: rename_to_placeholder,
    };
    scan_accounts(session, ctx, &rule).await
}

async fn scan_accounts(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
    rule: &AccountRule,
) -> Result<CheckReport, AuditError> {
    let rows = session.query(queries::ACCOUNTS).await?;

    let mut flagged = Vec::new();
    for row in &rows {
        match Account::from_row(row) {
            Ok(account) if (rule.flags)(&account) => flagged.push(account),
            Ok(_) => {}
            Err(e) => ctx.report_error(RecoveredError::row(
                rule.kind,
                format!("Cannot read account row: {e}"),
            ))?,
        }
    }

    let mut report = CheckReport::new(rule.kind);
    if flagged.is_empty() {
        ctx.verbose(rule.clean)?;
        return Ok(report);
    }

    report.findings = flagged.len();
    ctx.recommend(&format!("Found {} {}", flagged.len(), rule.found))?;
    for account in &flagged {
        let remediation = ctx.emit(session, rule.kind, (rule.remedy)(account)).await?;
        report.remediations.push(remediation);
    }
    Ok(report)
}

/// Read `(account, password hash)`; a NULL hash counts as empty.
fn password_row(row: &Row) -> Result<(Account, String), DbError> {
    let account = Account::from_row(row)?;
    let password = match row.get("password") {
        Ok(hash) => hash.to_string(),
        Err(DbError::NullValue(_)) => String::new(),
        Err(e) => return Err(e),
    };
    Ok((account, password))
}

async fn load_passwords(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
    kind: CheckKind,
) -> Result<Vec<(Account, String)>, AuditError> {
    let configured = ctx.options().password_column.clone();
    let mut columns = vec![configured.as_str()];
    if configured == DEFAULT_PASSWORD_COLUMN {
        columns.push(FALLBACK_PASSWORD_COLUMN);
    }

    let mut rows = None;
    for column in columns {
        match session.query(&queries::accounts_with_password(column)).await {
            Ok(found) => {
                rows = Some(found);
                break;
            }
            Err(e) if e.is_unknown_column() => {
                tracing::debug!(check = %kind, column, "Password column not found");
            }
            Err(e) => return Err(e.into()),
        }
    }
    let rows = rows.ok_or_else(|| AuditError::PasswordColumn {
        check: kind,
        column: configured,
    })?;

    let mut accounts = Vec::with_capacity(rows.len());
    for row in &rows {
        match password_row(row) {
            Ok(entry) => accounts.push(entry),
            Err(e) => ctx.report_error(RecoveredError::row(
                kind,
                format!("Cannot read account row: {e}"),
            ))?,
        }
    }
    Ok(accounts)
}

pub(super) async fn empty_password(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::EmptyPassword;
    let accounts = load_passwords(session, ctx, kind).await?;
    let flagged: Vec<&Account> = accounts
        .iter()
        .filter(|(_, password)| password.is_empty())
        .map(|(account, _)| account)
        .collect();

    let mut report = CheckReport::new(kind);
    if flagged.is_empty() {
        ctx.verbose("No empty password accounts found")?;
        return Ok(report);
    }

    report.findings = flagged.len();
    ctx.recommend(&format!(
        "Found {} accounts with empty passwords",
        flagged.len()
    ))?;
    for account in flagged {
        let remediation = ctx
            .emit(session, kind, set_placeholder_password(account))
            .await?;
        report.remediations.push(remediation);
    }
    Ok(report)
}

/// Leading characters of a password hash, for logs.
#[must_use]
pub fn fingerprint(hash: &str) -> &str {
    hash.get(..FINGERPRINT_LEN).unwrap_or(hash)
}

/// Accounts sharing one password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordGroup {
    /// Leading characters of the shared hash.
    pub fingerprint: String,
    pub accounts: Vec<Account>,
}

/// Group accounts by identical non-empty password hash.
///
/// Only groups spanning at least two distinct users are returned. Groups are
/// ordered by hash and accounts within a group by `(user, host)`.
#[must_use]
pub fn shared_password_groups(accounts: &[(Account, String)]) -> Vec<PasswordGroup> {
    let mut by_hash: BTreeMap<&str, BTreeSet<&Account>> = BTreeMap::new();
    for (account, hash) in accounts {
        if !hash.is_empty() {
            by_hash.entry(hash.as_str()).or_default().insert(account);
        }
    }

    by_hash
        .into_iter()
        .filter(|(_, group)| {
            let users: BTreeSet<&str> = group.iter().map(|a| a.user.as_str()).collect();
            users.len() > 1
        })
        .map(|(hash, group)| PasswordGroup {
            fingerprint: fingerprint(hash).to_string(),
            accounts: group.into_iter().cloned().collect(),
        })
        .collect()
}

pub(super) async fn shared_password(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::SharedPassword;
    let accounts = load_passwords(session, ctx, kind).await?;
    let groups = shared_password_groups(&accounts);

    let mut report = CheckReport::new(kind);
    if groups.is_empty() {
        ctx.verbose("No accounts sharing passwords found")?;
        return Ok(report);
    }

    ctx.verbose(&format!(
        "There are {} groups of accounts sharing the same passwords",
        groups.len()
    ))?;
    for group in &groups {
        tracing::debug!(
            fingerprint = %group.fingerprint,
            size = group.accounts.len(),
            "Shared password group"
        );
        let names: Vec<String> = group.accounts.iter().map(ToString::to_string).collect();
        ctx.recommend(&format!(
            "The following accounts have different users yet share the same password: {}",
            names.join(", ")
        ))?;
        report.findings += group.accounts.len();
        for account in &group.accounts {
            let remediation = ctx
                .emit(session, kind, set_placeholder_password(account))
                .await?;
            report.remediations.push(remediation);
        }
    }
    Ok(report)
}
