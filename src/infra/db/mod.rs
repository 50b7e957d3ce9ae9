//! SQLite persistence (infrastructure).

pub mod database;
pub mod store;

pub use database::{Database, SCHEMA_VERSION};
pub use store::{AccountStore, DbConn, TransactionStore};
