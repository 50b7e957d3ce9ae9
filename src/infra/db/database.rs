//! SQLite database setup and connection management for Spendbook
//! Handles store creation, schema versioning and the destructive upgrade policy.

use super::store::{AccountStore, DbConn, TransactionStore, lock};
use crate::infra::app_config;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Version stamped into `PRAGMA user_version`.
///
/// Any stored version other than `0` (fresh file) or this value causes both
/// tables to be dropped and recreated. There is no column-level migration.
pub const SCHEMA_VERSION: i32 = 1;

/// Database wrapper that owns the SQLite connection
pub struct Database {
    conn: DbConn,
    path: Option<PathBuf>,
}

impl Database {
    /// Create or open the database at the configured location
    pub fn open() -> Result<Self> {
        Self::open_at(Self::default_path())
    }

    /// Create an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        };
        db.init()?;
        Ok(db)
    }

    /// Open (creating on first use) the store called `name` inside `dir`.
    pub fn open_named(dir: &Path, name: &str) -> Result<Self> {
        Self::open_at(dir.join(name))
    }

    /// Create or open the database at a specific path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        };
        db.init()?;
        Ok(db)
    }

    /// Get the default database path
    pub fn default_path() -> PathBuf {
        app_config::database_path(&app_config::load_config())
    }

    /// Location of the store file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a handle to the shared connection
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    pub fn account_store(&self) -> AccountStore {
        AccountStore::new(self.connection())
    }

    pub fn transaction_store(&self) -> TransactionStore {
        TransactionStore::new(self.connection())
    }

    /// Version currently stamped in the store.
    pub fn schema_version(&self) -> Result<i32> {
        let conn = lock(&self.conn)?;
        let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }

    /// Drop both tables and recreate them empty.
    pub fn reset(&self) -> Result<()> {
        let mut conn = lock(&self.conn)?;
        log::info!("Resetting accounts and transactions tables");
        let tx = conn.transaction()?;
        Self::drop_schema(&tx)?;
        Self::create_schema(&tx)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        Ok(())
    }

    /// Initialize database schema
    fn init(&self) -> Result<()> {
        let mut conn = lock(&self.conn)?;

        let existing_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        match existing_version {
            SCHEMA_VERSION => {}
            0 => {
                log::info!("Creating schema version {}", SCHEMA_VERSION);
                Self::create_schema(&conn)?;
                conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            }
            other => {
                log::warn!(
                    "Schema version changed from {} to {}, dropping all stored data",
                    other,
                    SCHEMA_VERSION
                );
                let tx = conn.transaction()?;
                Self::drop_schema(&tx)?;
                Self::create_schema(&tx)?;
                tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
                tx.commit()?;
            }
        }

        Ok(())
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                accountNo TEXT PRIMARY KEY,
                bankName TEXT NOT NULL,
                accountHolderName TEXT NOT NULL,
                balance REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                accountNo TEXT NOT NULL,
                expenseType TEXT NOT NULL CHECK (expenseType IN ('EXPENSE','INCOME')),
                amount REAL NOT NULL,
                date INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            "#,
        )?;
        Ok(())
    }

    fn drop_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS accounts;
            DROP TABLE IF EXISTS transactions;
            "#,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Account;
    use tempfile::TempDir;

    fn table_exists(db: &Database, name: &str) -> bool {
        let conn = db.conn.lock().unwrap();
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_in_memory_creates_schema() -> Result<()> {
        let db = Database::open_in_memory()?;
        assert!(table_exists(&db, "accounts"));
        assert!(table_exists(&db, "transactions"));
        assert_eq!(db.schema_version()?, SCHEMA_VERSION);
        assert!(db.path().is_none());
        Ok(())
    }

    #[test]
    fn test_open_named_creates_store_on_first_use() -> Result<()> {
        let dir = TempDir::new()?;
        let nested = dir.path().join("data");
        let db = Database::open_named(&nested, "expenses.sqlite")?;

        assert!(nested.join("expenses.sqlite").exists());
        assert_eq!(db.path(), Some(nested.join("expenses.sqlite").as_path()));
        Ok(())
    }

    #[test]
    fn test_reopen_same_version_keeps_data() -> Result<()> {
        let dir = TempDir::new()?;
        {
            let db = Database::open_named(dir.path(), "keep.sqlite")?;
            db.account_store()
                .insert(&Account::new("A1", "BankX", "Holder", 100.0))?;
        }

        let db = Database::open_named(dir.path(), "keep.sqlite")?;
        assert!(db.account_store().find_by_no("A1")?.is_some());
        Ok(())
    }

    #[test]
    fn test_version_change_drops_and_recreates() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("upgrade.sqlite");
        {
            let db = Database::open_at(path.clone())?;
            db.account_store()
                .insert(&Account::new("A1", "BankX", "Holder", 100.0))?;
            let conn = db.conn.lock().unwrap();
            conn.pragma_update(None, "user_version", SCHEMA_VERSION + 41)?;
        }

        let db = Database::open_at(path)?;
        assert_eq!(db.schema_version()?, SCHEMA_VERSION);
        assert!(db.account_store().list_all()?.is_empty());
        assert!(table_exists(&db, "transactions"));
        Ok(())
    }

    #[test]
    fn test_reset_clears_both_tables() -> Result<()> {
        let db = Database::open_in_memory()?;
        db.account_store()
            .insert(&Account::new("A1", "BankX", "Holder", 1.0))?;
        db.transaction_store().insert(&crate::domain::Transaction::new(
            chrono::Utc::now(),
            "A1",
            crate::domain::ExpenseType::Income,
            1.0,
        ))?;

        db.reset()?;

        assert!(db.account_store().list_all()?.is_empty());
        assert_eq!(db.transaction_store().count()?, 0);
        Ok(())
    }
}
