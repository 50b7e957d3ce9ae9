//! Raw CRUD over the `accounts` and `transactions` tables.
//!
//! Stores never interpret absence as an error: a missing row is `Ok(None)`,
//! `Ok(false)` or an empty list, while `Err` is reserved for failures of the
//! underlying SQLite connection.

mod account;
mod transaction;

pub use account::AccountStore;
pub use transaction::TransactionStore;

use anyhow::Result;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

pub type DbConn = Arc<Mutex<Connection>>;

pub(crate) fn lock(conn: &DbConn) -> Result<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| anyhow::anyhow!("db lock: {}", e))
}
