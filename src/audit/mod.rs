//! Account, privilege and server setting audit.
//!
//! [`AuditEngine`] runs the checks of [`CheckKind::ALL`] in order against one
//! [`Session`](crate::db::Session), writing a line-oriented report: `-- `
//! narration in verbose mode, `-- ERROR: ` lines for recovered failures, and
//! remediation statements when printing instead of executing.

mod account;
mod checks;
mod context;
mod emitter;
mod engine;
mod error;
mod kind;
pub mod privileges;
pub mod queries;
mod summary;

pub use account::{escape_literal, Account, GranteeParser, LOCAL_HOSTS};
pub use checks::{
    desired_sql_mode, fingerprint, is_global_all_grant, is_truthy, run_check,
    shared_password_groups, PasswordGroup,
};
pub use context::CheckContext;
pub use emitter::{EmitOutcome, StatementEmitter};
pub use engine::AuditEngine;
pub use error::{AuditError, ErrorSink, RecoveredError, RecoveryKind};
pub use kind::CheckKind;
pub use summary::{AuditSummary, CheckReport, Remediation, RemediationStatus};
