//! Global configuration checks.

use crate::audit::account::escape_literal;
use crate::audit::queries;
use crate::audit::{AuditError, CheckContext, CheckKind, CheckReport, RecoveredError};
use crate::db::{Row, Session};

const NO_AUTO_CREATE_USER: &str = "NO_AUTO_CREATE_USER";

/// Name of the scratch database shipped with default installs.
const TEST_DATABASE: &str = "test";

/// The `sql_mode` to set, or `None` if `current` already has
/// `NO_AUTO_CREATE_USER`.
#[must_use]
pub fn desired_sql_mode(current: &str) -> Option<String> {
    if current.split(',').any(|mode| mode == NO_AUTO_CREATE_USER) {
        return None;
    }
    if current.is_empty() {
        Some(NO_AUTO_CREATE_USER.to_string())
    } else {
        Some(format!("{NO_AUTO_CREATE_USER},{current}"))
    }
}

/// Interpret a numeric server variable; `None` if it is not a number.
#[must_use]
pub fn is_truthy(value: &str) -> Option<bool> {
    value.trim().parse::<i64>().ok().map(|n| n != 0)
}

fn first_row(rows: &[Row], check: CheckKind) -> Result<&Row, AuditError> {
    rows.first().ok_or(AuditError::MissingRow { check })
}

pub(super) async fn sql_mode(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::SqlMode;
    let rows = session.query(queries::SQL_MODE).await?;
    let current = first_row(&rows, kind)?.get("sql_mode")?;

    let mut report = CheckReport::new(kind);
    let Some(desired) = desired_sql_mode(current) else {
        ctx.verbose("sql_mode is good")?;
        return Ok(report);
    };

    report.findings = 1;
    ctx.recommend(&format!("sql_mode does not contain {NO_AUTO_CREATE_USER}"))?;
    let statement = format!("SET GLOBAL sql_mode = '{}'", escape_literal(&desired));
    report.remediations.push(ctx.emit(session, kind, statement).await?);
    Ok(report)
}

pub(super) async fn old_passwords(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::OldPasswords;
    let rows = session.query(queries::OLD_PASSWORDS).await?;
    let value = first_row(&rows, kind)?.get("old_passwords")?;
    let enabled = is_truthy(value).ok_or_else(|| AuditError::UnexpectedValue {
        check: kind,
        value: value.to_string(),
    })?;

    let mut report = CheckReport::new(kind);
    if enabled {
        report.findings = 1;
        ctx.recommend("Old passwords are being used")?;
        ctx.verbose(
            "Consider removing old-passwords from configuration. Make sure you read the manual first",
        )?;
    } else {
        ctx.verbose("New passwords are used")?;
    }
    Ok(report)
}

pub(super) async fn skip_networking(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::SkipNetworking;
    let rows = session.query(queries::SKIP_NETWORKING).await?;
    let value = first_row(&rows, kind)?.get("Value")?;

    let mut report = CheckReport::new(kind);
    if value == "OFF" {
        report.findings = 1;
        ctx.recommend("Networking is enabled")?;
        ctx.verbose("This is usually fine. If you're only accessing MySQL from the localhost,")?;
        ctx.verbose("consider setting --skip-networking and using UNIX socket or named pipes.")?;
    } else {
        ctx.verbose("Networking is disabled")?;
    }
    Ok(report)
}

pub(super) async fn test_database(
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    let kind = CheckKind::TestDatabase;
    let rows = session.query(queries::DATABASES).await?;

    let mut found = false;
    for row in &rows {
        match row.get_index(0) {
            Ok(name) => found |= name == TEST_DATABASE,
            Err(e) => ctx.report_error(RecoveredError::row(
                kind,
                format!("Cannot read database row: {e}"),
            ))?,
        }
    }

    let mut report = CheckReport::new(kind);
    if !found {
        ctx.verbose("`test` database not found")?;
        return Ok(report);
    }

    report.findings = 1;
    ctx.recommend("`test` database found")?;
    let statement = format!("DROP DATABASE {TEST_DATABASE}");
    report.remediations.push(ctx.emit(session, kind, statement).await?);
    Ok(report)
}
