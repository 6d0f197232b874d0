//! The audit checks.
//!
//! Each check reads what it needs, narrates, and hands one remediation
//! statement per non-conforming row to the context. Failures tied to a single
//! row are reported and stepped over; anything else is returned.

mod accounts;
mod grants;
mod server;

use crate::db::Session;

use super::{AuditError, CheckContext, CheckKind, CheckReport};

pub use accounts::{fingerprint, shared_password_groups, PasswordGroup};
pub use grants::is_global_all_grant;
pub use server::{desired_sql_mode, is_truthy};

/// Run one check.
///
/// # Errors
///
/// Returns an error if a diagnostic query fails or the report cannot be
/// written.
pub async fn run_check(
    kind: CheckKind,
    session: &mut dyn Session,
    ctx: &mut CheckContext<'_>,
) -> Result<CheckReport, AuditError> {
    ctx.topic(kind.topic())?;
    match kind {
        CheckKind::RemoteRoot => accounts::remote_root(session, ctx).await,
        CheckKind::AnonymousUser => accounts::anonymous_user(session, ctx).await,
        CheckKind::WildcardHost => accounts::wildcard_host(session, ctx).await,
        CheckKind::EmptyPassword => accounts::empty_password(session, ctx).await,
        CheckKind::SharedPassword => accounts::shared_password(session, ctx).await,
        CheckKind::GlobalGrants => grants::global_grants(session, ctx).await,
        CheckKind::AdminPrivileges => grants::admin_privileges(session, ctx).await,
        CheckKind::SqlMode => server::sql_mode(session, ctx).await,
        CheckKind::OldPasswords => server::old_passwords(session, ctx).await,
        CheckKind::SkipNetworking => server::skip_networking(session, ctx).await,
        CheckKind::TestDatabase => server::test_database(session, ctx).await,
    }
}
