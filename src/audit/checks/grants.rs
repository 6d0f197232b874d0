//! Privilege checks.

use crate::audit::account::{Account, GranteeParser};
use crate::audit::privileges::{PrivilegeGroup, ADMIN};
use crate::audit::queries;
use crate::audit::{AuditError, CheckContext, CheckKind, CheckReport, RecoveredError};
use crate::db::Session;

/// Grant line prefix for unrestricted global privileges.
const ALL_PRIVILEGES_PREFIX: &str = "GRANT ALL PRIVILEGES ON *.* TO";

/// Whether a `SHOW GRANTS` line hands out every global privilege.
#[must_use]
pub fn is_global_all_grant(grant: &str) -> bool {
    grant.starts_with(ALL_PRIVILEGES_PREFIX)
}

pub(super) async fn global_grants(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::GlobalGrants;
    let rows = session.query(queries::ACCOUNTS).await?;

    let mut flagged: Vec<Account> = Vec::new();
    for row in &rows {
        let account = match Account::from_row(row) {
            Ok(account) => account,
            Err(e) => {
                ctx.report_error(RecoveredError::row(
                    kind,
                    format!("Cannot read account row: {e}"),
                ))?;
                continue;
            }
        };
        if account.is_root() {
            continue;
        }

        let sql = queries::show_grants(&account);
        let grants = match session.query(&sql).await {
            Ok(grants) => grants,
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "Cannot read grants");
                ctx.report_error(RecoveredError::row(kind, format!("Cannot {sql}")))?;
                continue;
            }
        };
        if grants
            .iter()
            .filter_map(|grant| grant.get_index(0).ok())
            .any(is_global_all_grant)
        {
            flagged.push(account);
        }
    }

    let mut report = CheckReport::new(kind);
    if flagged.is_empty() {
        ctx.verbose("No accounts found with all privileges")?;
        return Ok(report);
    }

    report.findings = flagged.len();
    ctx.verbose(&format!(
        "There are {} non root accounts with all privileges",
        flagged.len()
    ))?;
    for account in &flagged {
        let statement = format!("GRANT <specific privileges> ON *.* TO {account}");
        report.remediations.push(ctx.emit(session, kind, statement).await?);
    }
    Ok(report)
}

/// Admin privileges named in a `GROUP_CONCAT` list, in list order.
fn admin_privileges_in(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|p| PrivilegeGroup::classify(p) == Some(PrivilegeGroup::Admin))
        .collect()
}

pub(super) async fn admin_privileges(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::AdminPrivileges;
    let parser = GranteeParser::new()?;
    let rows = session.query(&queries::admin_grantees()).await?;

    let mut flagged: Vec<(Account, String)> = Vec::new();
    for row in &rows {
        let grantee = match row.get("GRANTEE") {
            Ok(grantee) => grantee,
            Err(e) => {
                ctx.report_error(RecoveredError::row(
                    kind,
                    format!("Cannot read grantee row: {e}"),
                ))?;
                continue;
            }
        };
        if grantee.starts_with("'root'") {
            continue;
        }
        let Some(account) = parser.parse(grantee) else {
            ctx.report_error(RecoveredError::row(
                kind,
                format!("Cannot parse grantee {grantee}"),
            ))?;
            continue;
        };
        let held = row
            .get("privileges")
            .map(|list| admin_privileges_in(list).join(", "))
            .unwrap_or_default();
        flagged.push((account, held));
    }

    let mut report = CheckReport::new(kind);
    if flagged.is_empty() {
        ctx.verbose("No accounts found with admin privileges")?;
        return Ok(report);
    }

    report.findings = flagged.len();
    ctx.verbose(&format!(
        "There are {} non-root accounts with admin privileges",
        flagged.len()
    ))?;
    ctx.recommend(&format!("admin privileges are: {}", ADMIN.join(", ")))?;
    for (account, held) in &flagged {
        if !held.is_empty() {
            ctx.verbose(&format!("{account} holds: {held}"))?;
        }
        let statement = format!("GRANT <non-admin-privileges> ON *.* TO {account}");
        report.remediations.push(ctx.emit(session, kind, statement).await?);
    }
    Ok(report)
}
