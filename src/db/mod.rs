//! Database session seam.
//!
//! The audit only ever needs two capabilities from a server: run a query and
//! fetch its rows, or run a statement for its side effect. [`Session`] is that
//! seam; [`MySqlSession`] talks to a live server and [`ScriptedSession`]
//! replays canned answers in tests.

mod error;
mod mysql;
mod row;
mod scripted;
mod session;

pub use error::DbError;
pub use mysql::MySqlSession;
pub use row::Row;
pub use scripted::ScriptedSession;
pub use session::Session;
