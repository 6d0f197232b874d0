//! Tests for the privilege checks.

use mysql_audit::audit::privileges::ADMIN;
use mysql_audit::audit::{queries, Account, CheckKind, RecoveryKind};
use mysql_audit::db::{Row, ScriptedSession};

use super::{account, options, run, topic_lines};

fn grants(user: &str, host: &str, lines: &[&str]) -> (String, Vec<Row>) {
    let header = format!("Grants for {user}@{host}");
    let rows = lines
        .iter()
        .map(|line| Row::from_pairs(&[(header.as_str(), *line)]))
        .collect();
    (queries::show_grants(&Account::new(user, host)), rows)
}

fn grantee(name: &str, privileges: &str) -> Row {
    Row::from_pairs(&[("GRANTEE", name), ("privileges", privileges)])
}

#[tokio::test]
async fn global_grants_flags_all_privileges_on_everything() {
    let (app_sql, app_rows) = grants(
        "app",
        "%",
        &["GRANT ALL PRIVILEGES ON *.* TO 'app'@'%' WITH GRANT OPTION"],
    );
    let (ro_sql, ro_rows) = grants(
        "ro",
        "%",
        &[
            "GRANT USAGE ON *.* TO 'ro'@'%'",
            "GRANT ALL PRIVILEGES ON `reports`.* TO 'ro'@'%'",
        ],
    );
    let mut session = ScriptedSession::new()
        .with_rows(
            queries::ACCOUNTS,
            vec![
                account("app", "%"),
                account("ro", "%"),
                account("root", "localhost"),
            ],
        )
        .with_rows(app_sql.clone(), app_rows)
        .with_rows(ro_sql.clone(), ro_rows);

    let run = run(CheckKind::GlobalGrants, &mut session, &options(false, true)).await;

    assert_eq!(run.output, "GRANT <specific privileges> ON *.* TO 'app'@'%';\n");
    assert_eq!(run.report.findings, 1);
    assert_eq!(
        session.queries(),
        [queries::ACCOUNTS.to_string(), app_sql, ro_sql]
    );
}

#[tokio::test]
async fn global_grants_reports_unreadable_grants_and_continues() {
    let (app_sql, app_rows) = grants("app", "%", &["GRANT ALL PRIVILEGES ON *.* TO 'app'@'%'"]);
    let mut session = ScriptedSession::new()
        .with_rows(
            queries::ACCOUNTS,
            vec![account("app", "%"), account("ghost", "%")],
        )
        .with_rows(app_sql, app_rows)
        .with_failure(
            queries::show_grants(&Account::new("ghost", "%")),
            "There is no such grant defined",
        );

    let run = run(CheckKind::GlobalGrants, &mut session, &options(false, true)).await;

    assert_eq!(
        run.output,
        "-- ERROR: Cannot SHOW GRANTS FOR 'ghost'@'%'\n\
         GRANT <specific privileges> ON *.* TO 'app'@'%';\n"
    );
    assert_eq!(run.errors.len(), 1);
    assert_eq!(run.errors[0].kind, RecoveryKind::Row);
    assert_eq!(run.errors[0].check, CheckKind::GlobalGrants);
}

#[tokio::test]
async fn global_grants_clean_in_verbose_mode() {
    let mut session = ScriptedSession::new().with_rows(
        queries::ACCOUNTS,
        vec![account("root", "localhost"), account("root", "%")],
    );

    let run = run(CheckKind::GlobalGrants, &mut session, &options(true, true)).await;

    assert_eq!(
        run.output,
        format!(
            "{}-- No accounts found with all privileges\n",
            topic_lines(CheckKind::GlobalGrants)
        )
    );
    assert_eq!(session.queries(), [queries::ACCOUNTS]);
}

#[tokio::test]
async fn admin_privileges_skip_root_grantees() {
    let mut session = ScriptedSession::new().with_rows(
        queries::admin_grantees(),
        vec![
            grantee("'root'@'localhost'", "SUPER,SHUTDOWN,PROCESS"),
            grantee("'app'@'%'", "SUPER,PROCESS"),
        ],
    );

    let run = run(CheckKind::AdminPrivileges, &mut session, &options(true, true)).await;

    let expected = format!(
        "{}-- There are 1 non-root accounts with admin privileges\n\
         -- admin privileges are: {}. Recommended actions:\n\
         -- 'app'@'%' holds: SUPER, PROCESS\n\
         GRANT <non-admin-privileges> ON *.* TO 'app'@'%';\n",
        topic_lines(CheckKind::AdminPrivileges),
        ADMIN.join(", ")
    );
    assert_eq!(run.output, expected);
    assert_eq!(run.report.findings, 1);
}

#[tokio::test]
async fn admin_privileges_unparsable_grantee_is_reported() {
    let mut session = ScriptedSession::new().with_rows(
        queries::admin_grantees(),
        vec![grantee("app@%", "SUPER"), grantee("'o''neil'@'%'", "RELOAD")],
    );

    let run = run(CheckKind::AdminPrivileges, &mut session, &options(false, true)).await;

    assert_eq!(
        run.output,
        "-- ERROR: Cannot parse grantee app@%\n\
         GRANT <non-admin-privileges> ON *.* TO 'o''neil'@'%';\n"
    );
    assert_eq!(run.errors.len(), 1);
}

#[tokio::test]
async fn admin_privileges_execute_mode_sends_statement() {
    let mut session = ScriptedSession::new()
        .with_rows(queries::admin_grantees(), vec![grantee("'ops'@'10.%'", "RELOAD")]);

    let run = run(CheckKind::AdminPrivileges, &mut session, &options(false, false)).await;

    assert!(run.output.is_empty());
    assert_eq!(
        session.executed(),
        ["GRANT <non-admin-privileges> ON *.* TO 'ops'@'10.%'"]
    );
}
