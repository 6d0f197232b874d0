//! Tests for the account table checks.

use mysql_audit::audit::{queries, AuditError, CheckKind, RecoveryKind, RemediationStatus};
use mysql_audit::db::{Row, ScriptedSession};

use super::{account, account_with_password, options, run, topic_lines, try_run};

fn accounts(rows: Vec<Row>) -> ScriptedSession {
    ScriptedSession::new().with_rows(queries::ACCOUNTS, rows)
}

fn passwords(rows: Vec<Row>) -> ScriptedSession {
    ScriptedSession::new().with_rows(queries::accounts_with_password("password"), rows)
}

#[tokio::test]
async fn remote_root_drops_each_remote_account() {
    let mut session = accounts(vec![
        account("root", "%"),
        account("root", "10.0.0.1"),
        account("root", "localhost"),
        account("root", "127.0.0.1"),
        account("app", "%"),
    ]);

    let run = run(CheckKind::RemoteRoot, &mut session, &options(false, true)).await;

    assert_eq!(
        run.output,
        "DROP USER 'root'@'%';\nDROP USER 'root'@'10.0.0.1';\n"
    );
    assert_eq!(run.report.findings, 2);
    assert!(run
        .report
        .remediations
        .iter()
        .all(|r| r.status == RemediationStatus::Printed));
}

#[tokio::test]
async fn remote_root_verbose_narration() {
    let mut session = accounts(vec![account("root", "%")]);

    let run = run(CheckKind::RemoteRoot, &mut session, &options(true, true)).await;

    let expected = format!(
        "{}-- Found 1 non local 'root' accounts. Recommended actions:\nDROP USER 'root'@'%';\n",
        topic_lines(CheckKind::RemoteRoot)
    );
    assert_eq!(run.output, expected);
}

#[tokio::test]
async fn remote_root_clean_is_silent_unless_verbose() {
    let rows = vec![account("root", "localhost"), account("root", "127.0.0.1")];

    let quiet = run(
        CheckKind::RemoteRoot,
        &mut accounts(rows.clone()),
        &options(false, true),
    )
    .await;
    assert!(quiet.output.is_empty());
    assert!(quiet.report.is_clean());

    let verbose = run(CheckKind::RemoteRoot, &mut accounts(rows), &options(true, true)).await;
    assert!(verbose.output.ends_with("-- No remote 'root' accounts found\n"));
}

#[tokio::test]
async fn anonymous_user_is_dropped() {
    let mut session = accounts(vec![account("", "localhost"), account("app", "%")]);

    let run = run(CheckKind::AnonymousUser, &mut session, &options(false, true)).await;

    assert_eq!(run.output, "DROP USER ''@'localhost';\n");
}

#[tokio::test]
async fn wildcard_host_is_renamed_to_placeholder() {
    let mut session = accounts(vec![account("app", "%"), account("app", "10.0.0.%")]);

    let run = run(CheckKind::WildcardHost, &mut session, &options(false, true)).await;

    assert_eq!(
        run.output,
        "RENAME USER 'app'@'%' TO 'app'@'<specific host>';\n"
    );
}

#[tokio::test]
async fn malformed_row_is_reported_and_skipped() {
    let mut session = accounts(vec![
        Row::from_pairs(&[("user", "root")]),
        account("root", "%"),
    ]);

    let run = run(CheckKind::RemoteRoot, &mut session, &options(false, true)).await;

    assert_eq!(
        run.output,
        "-- ERROR: Cannot read account row: Column not found: host\nDROP USER 'root'@'%';\n"
    );
    assert_eq!(run.errors.len(), 1);
    assert_eq!(run.errors[0].kind, RecoveryKind::Row);
    assert_eq!(run.report.findings, 1);
}

#[tokio::test]
async fn empty_password_sets_placeholder() {
    let mut session = passwords(vec![
        account_with_password("app", "%", ""),
        account_with_password("root", "localhost", "*81F5E21E35407D884A6CD4A731AEBFB6AF209E1B"),
        Row::new()
            .with("user", Some("legacy"))
            .with("host", Some("localhost"))
            .with("password", None),
    ]);

    let run = run(CheckKind::EmptyPassword, &mut session, &options(false, true)).await;

    assert_eq!(
        run.output,
        "SET PASSWORD FOR 'app'@'%' = PASSWORD('<some password>');\n\
         SET PASSWORD FOR 'legacy'@'localhost' = PASSWORD('<some password>');\n"
    );
}

#[tokio::test]
async fn empty_password_reads_configured_column() {
    let mut opts = options(false, true);
    opts.password_column = "authentication_string".to_string();
    let mut session = ScriptedSession::new().with_rows(
        queries::accounts_with_password("authentication_string"),
        vec![account_with_password("app", "%", "")],
    );

    let run = run(CheckKind::EmptyPassword, &mut session, &opts).await;

    assert_eq!(run.report.findings, 1);
    assert_eq!(
        session.queries(),
        [queries::accounts_with_password("authentication_string")]
    );
}

#[tokio::test]
async fn shared_password_emits_one_statement_per_member() {
    let mut session = passwords(vec![
        account_with_password("app", "10.0.0.1", "*AAAA11111"),
        account_with_password("app", "10.0.0.2", "*AAAA11111"),
        account_with_password("etl", "%", "*AAAA11111"),
        account_with_password("root", "localhost", "*ROOT0000"),
        account_with_password("root", "127.0.0.1", "*ROOT0000"),
        account_with_password("solo", "%", "*BBBB22222"),
        account_with_password("x", "%", ""),
        account_with_password("y", "%", ""),
    ]);

    let run = run(CheckKind::SharedPassword, &mut session, &options(true, true)).await;

    let expected = format!(
        "{}-- There are 1 groups of accounts sharing the same passwords\n\
         -- The following accounts have different users yet share the same password: \
         'app'@'10.0.0.1', 'app'@'10.0.0.2', 'etl'@'%'. Recommended actions:\n\
         SET PASSWORD FOR 'app'@'10.0.0.1' = PASSWORD('<some password>');\n\
         SET PASSWORD FOR 'app'@'10.0.0.2' = PASSWORD('<some password>');\n\
         SET PASSWORD FOR 'etl'@'%' = PASSWORD('<some password>');\n",
        topic_lines(CheckKind::SharedPassword)
    );
    assert_eq!(run.output, expected);
    assert_eq!(run.report.findings, 3);
}

#[tokio::test]
async fn shared_password_does_not_group_on_prefix() {
    let mut session = passwords(vec![
        account_with_password("a", "%", "*ABCDE111"),
        account_with_password("b", "%", "*ABCDE222"),
    ]);

    let run = run(CheckKind::SharedPassword, &mut session, &options(false, true)).await;

    assert!(run.output.is_empty());
    assert!(run.report.is_clean());
}

#[tokio::test]
async fn missing_default_column_falls_back_to_authentication_string() {
    let mut session = ScriptedSession::new()
        .with_failure(
            queries::accounts_with_password("password"),
            "Unknown column 'password' in 'field list'",
        )
        .with_rows(
            queries::accounts_with_password("authentication_string"),
            vec![account_with_password("app", "%", "")],
        );

    let run = run(CheckKind::EmptyPassword, &mut session, &options(false, true)).await;

    assert_eq!(
        run.output,
        "SET PASSWORD FOR 'app'@'%' = PASSWORD('<some password>');\n"
    );
    assert_eq!(
        session.queries(),
        [
            queries::accounts_with_password("password"),
            queries::accounts_with_password("authentication_string"),
        ]
    );
}

#[tokio::test]
async fn missing_password_column_names_the_option() {
    let mut session = ScriptedSession::new()
        .with_failure(
            queries::accounts_with_password("password"),
            "Unknown column 'password' in 'field list'",
        )
        .with_failure(
            queries::accounts_with_password("authentication_string"),
            "Unknown column 'authentication_string' in 'field list'",
        );

    let (result, output) =
        try_run(CheckKind::EmptyPassword, &mut session, &options(false, true)).await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        AuditError::PasswordColumn {
            check: CheckKind::EmptyPassword,
            ..
        }
    ));
    assert!(err.to_string().contains("--password-column"));
    assert!(output.is_empty());
}

#[tokio::test]
async fn configured_password_column_has_no_fallback() {
    let mut opts = options(false, true);
    opts.password_column = "pwd_hash".to_string();
    let mut session = ScriptedSession::new().with_failure(
        queries::accounts_with_password("pwd_hash"),
        "Unknown column 'pwd_hash' in 'field list'",
    );

    let (result, _) = try_run(CheckKind::SharedPassword, &mut session, &opts).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("no column pwd_hash"));
    assert_eq!(session.queries().len(), 1);
}

#[tokio::test]
async fn other_password_query_failures_are_not_retried() {
    let mut session = ScriptedSession::new().with_failure(
        queries::accounts_with_password("password"),
        "SELECT command denied to user",
    );

    let (result, _) =
        try_run(CheckKind::EmptyPassword, &mut session, &options(false, true)).await;

    assert!(matches!(result, Err(AuditError::Db(_))));
    assert_eq!(session.queries().len(), 1);
}
