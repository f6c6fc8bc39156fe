//! Repository implementations for data access in Showtrack.
//!
//! Provides synchronous database operations for shows, user lists and list
//! membership. Async callers go through the stores in `application`.

mod list_show;
mod show;
mod user_list;

pub use list_show::{ListShowRepository, MembershipChange};
pub use show::ShowRepository;
pub use user_list::UserListRepository;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

pub type DbConn = Arc<Mutex<Connection>>;

/// Acquire the shared connection, reporting a poisoned lock as an error.
pub(crate) fn lock(conn: &DbConn) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("database connection lock poisoned"))
}
