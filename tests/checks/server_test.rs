//! Tests for the global configuration checks.

use mysql_audit::audit::{queries, AuditError, CheckKind};
use mysql_audit::db::{Row, ScriptedSession};

use super::{options, run, topic_lines, try_run};

fn single(sql: &str, column: &str, value: &str) -> ScriptedSession {
    ScriptedSession::new().with_rows(sql, vec![Row::from_pairs(&[(column, value)])])
}

fn networking(value: &str) -> ScriptedSession {
    ScriptedSession::new().with_rows(
        queries::SKIP_NETWORKING,
        vec![Row::from_pairs(&[
            ("Variable_name", "skip_networking"),
            ("Value", value),
        ])],
    )
}

fn databases(names: &[&str]) -> ScriptedSession {
    let rows = names
        .iter()
        .map(|name| Row::from_pairs(&[("Database", *name)]))
        .collect();
    ScriptedSession::new().with_rows(queries::DATABASES, rows)
}

#[tokio::test]
async fn sql_mode_prepends_no_auto_create_user() {
    let mut session = single(queries::SQL_MODE, "sql_mode", "STRICT_TRANS_TABLES");

    let run = run(CheckKind::SqlMode, &mut session, &options(true, true)).await;

    let expected = format!(
        "{}-- sql_mode does not contain NO_AUTO_CREATE_USER. Recommended actions:\n\
         SET GLOBAL sql_mode = 'NO_AUTO_CREATE_USER,STRICT_TRANS_TABLES';\n",
        topic_lines(CheckKind::SqlMode)
    );
    assert_eq!(run.output, expected);
    assert_eq!(run.report.findings, 1);
}

#[tokio::test]
async fn sql_mode_already_set_is_clean() {
    let mut session = single(
        queries::SQL_MODE,
        "sql_mode",
        "STRICT_TRANS_TABLES,NO_AUTO_CREATE_USER",
    );

    let quiet = run(CheckKind::SqlMode, &mut session, &options(false, true)).await;
    assert!(quiet.output.is_empty());
    assert!(quiet.report.is_clean());
}

#[tokio::test]
async fn sql_mode_empty_sets_flag_alone() {
    let mut session = single(queries::SQL_MODE, "sql_mode", "");

    let run = run(CheckKind::SqlMode, &mut session, &options(false, false)).await;

    assert!(run.output.is_empty());
    assert_eq!(
        session.executed(),
        ["SET GLOBAL sql_mode = 'NO_AUTO_CREATE_USER'"]
    );
}

#[tokio::test]
async fn sql_mode_without_rows_fails() {
    let mut session = ScriptedSession::new().with_rows(queries::SQL_MODE, Vec::new());

    let (result, _) = try_run(CheckKind::SqlMode, &mut session, &options(false, true)).await;

    assert!(matches!(
        result,
        Err(AuditError::MissingRow {
            check: CheckKind::SqlMode
        })
    ));
}

#[tokio::test]
async fn old_passwords_enabled_is_narrated() {
    let mut session = single(queries::OLD_PASSWORDS, "old_passwords", "1");

    let run = run(CheckKind::OldPasswords, &mut session, &options(true, true)).await;

    let expected = format!(
        "{}-- Old passwords are being used. Recommended actions:\n\
         -- Consider removing old-passwords from configuration. Make sure you read the manual first\n",
        topic_lines(CheckKind::OldPasswords)
    );
    assert_eq!(run.output, expected);
    assert!(run.report.remediations.is_empty());
}

#[tokio::test]
async fn old_passwords_disabled() {
    let mut session = single(queries::OLD_PASSWORDS, "old_passwords", "0");

    let run = run(CheckKind::OldPasswords, &mut session, &options(true, true)).await;

    assert!(run.output.ends_with("-- New passwords are used\n"));
    assert!(run.report.is_clean());
}

#[tokio::test]
async fn old_passwords_unexpected_value_fails() {
    let mut session = single(queries::OLD_PASSWORDS, "old_passwords", "MAYBE");

    let (result, _) =
        try_run(CheckKind::OldPasswords, &mut session, &options(false, true)).await;

    match result {
        Err(AuditError::UnexpectedValue { check, value }) => {
            assert_eq!(check, CheckKind::OldPasswords);
            assert_eq!(value, "MAYBE");
        }
        other => panic!("expected UnexpectedValue, got {other:?}"),
    }
}

#[tokio::test]
async fn skip_networking_off_is_narration_only() {
    let mut session = networking("OFF");

    let run = run(CheckKind::SkipNetworking, &mut session, &options(true, false)).await;

    let expected = format!(
        "{}-- Networking is enabled. Recommended actions:\n\
         -- This is usually fine. If you're only accessing MySQL from the localhost,\n\
         -- consider setting --skip-networking and using UNIX socket or named pipes.\n",
        topic_lines(CheckKind::SkipNetworking)
    );
    assert_eq!(run.output, expected);
    assert!(session.executed().is_empty());
}

#[tokio::test]
async fn skip_networking_on() {
    let mut session = networking("ON");

    let run = run(CheckKind::SkipNetworking, &mut session, &options(true, true)).await;

    assert!(run.output.ends_with("-- Networking is disabled\n"));
    assert!(run.report.is_clean());
}

#[tokio::test]
async fn test_database_is_dropped() {
    let mut session = databases(&["information_schema", "mysql", "test"]);

    let run = run(CheckKind::TestDatabase, &mut session, &options(false, true)).await;

    assert_eq!(run.output, "DROP DATABASE test;\n");
}

#[tokio::test]
async fn test_database_name_must_match_exactly() {
    let mut session = databases(&["mysql", "test_app", "testing"]);

    let run = run(CheckKind::TestDatabase, &mut session, &options(true, true)).await;

    assert!(run.output.ends_with("-- `test` database not found\n"));
    assert!(run.report.is_clean());
}

#[tokio::test]
async fn test_database_drop_failure_is_reported() {
    let mut session =
        databases(&["test"]).with_failure("DROP DATABASE test", "Access denied for user");

    let run = run(CheckKind::TestDatabase, &mut session, &options(false, false)).await;

    assert_eq!(run.output, "-- ERROR: error executing: DROP DATABASE test;\n");
    assert_eq!(run.errors.len(), 1);
    assert_eq!(session.executed(), ["DROP DATABASE test"]);
}
