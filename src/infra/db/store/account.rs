use super::{DbConn, lock};
use crate::domain::Account;
use anyhow::Result;
use rusqlite::{OptionalExtension, Row};

const ACCOUNT_COLUMNS: &str = "accountNo, bankName, accountHolderName, balance";

/// Store for rows of the `accounts` table.
#[derive(Clone)]
pub struct AccountStore {
    conn: DbConn,
}

impl AccountStore {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Insert a new account. Returns `false` when the account number is
    /// already taken; the existing row is left untouched.
    pub fn insert(&self, account: &Account) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO accounts (accountNo, bankName, accountHolderName, balance) VALUES (?1, ?2, ?3, ?4)",
            (
                &account.account_no,
                &account.bank_name,
                &account.account_holder_name,
                account.balance,
            ),
        )?;
        log::debug!("insert account {}: {} row(s)", account.account_no, inserted);
        Ok(inserted > 0)
    }

    /// Delete an account. Transactions logged against it are kept.
    pub fn delete(&self, account_no: &str) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let deleted = conn.execute("DELETE FROM accounts WHERE accountNo = ?1", [account_no])?;
        log::debug!("delete account {}: {} row(s)", account_no, deleted);
        Ok(deleted > 0)
    }

    pub fn find_by_no(&self, account_no: &str) -> Result<Option<Account>> {
        let conn = lock(&self.conn)?;
        let account = conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE accountNo = ?1"),
                [account_no],
                account_from_row,
            )
            .optional()?;
        Ok(account)
    }

    /// All accounts in row order.
    pub fn list_all(&self) -> Result<Vec<Account>> {
        let conn = lock(&self.conn)?;
        let mut stmt =
            conn.prepare(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY rowid"))?;
        let rows = stmt.query_map([], account_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn list_numbers(&self) -> Result<Vec<String>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT accountNo FROM accounts ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Overwrite the balance. Returns `false` when no such account exists.
    pub fn set_balance(&self, account_no: &str, balance: f64) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let updated = conn.execute(
            "UPDATE accounts SET balance = ?1 WHERE accountNo = ?2",
            (balance, account_no),
        )?;
        log::debug!("set balance of {} to {}: {} row(s)", account_no, balance, updated);
        Ok(updated > 0)
    }

    /// Add `delta` to the balance in a single statement, so concurrent
    /// adjustments of the same account cannot overwrite each other.
    /// Returns `false` when no such account exists.
    pub fn adjust_balance(&self, account_no: &str, delta: f64) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let updated = conn.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE accountNo = ?2",
            (delta, account_no),
        )?;
        log::debug!("adjust balance of {} by {}: {} row(s)", account_no, delta, updated);
        Ok(updated > 0)
    }
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        account_no: row.get(0)?,
        bank_name: row.get(1)?,
        account_holder_name: row.get(2)?,
        balance: row.get(3)?,
    })
}
