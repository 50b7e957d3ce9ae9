use super::{DbConn, lock};
use crate::domain::{ExpenseType, Transaction, TransactionId};
use anyhow::Result;
use chrono::DateTime;
use rusqlite::Row;
use rusqlite::types::Type;
use std::str::FromStr;

/// Store for the append-only `transactions` table.
#[derive(Clone)]
pub struct TransactionStore {
    conn: DbConn,
}

impl TransactionStore {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Append a transaction and return its assigned id. The `id` field of
    /// the argument is ignored.
    pub fn insert(&self, transaction: &Transaction) -> Result<TransactionId> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO transactions (accountNo, expenseType, amount, date) VALUES (?1, ?2, ?3, ?4)",
            (
                &transaction.account_no,
                transaction.expense_type.to_string(),
                transaction.amount,
                transaction.date.timestamp_millis(),
            ),
        )?;
        let id = conn.last_insert_rowid();
        log::debug!(
            "logged {} of {} against {} as #{}",
            transaction.expense_type,
            transaction.amount,
            transaction.account_no,
            id
        );
        Ok(id)
    }

    /// Whole log, oldest first. Entries sharing a timestamp keep insertion order.
    pub fn list_all(&self) -> Result<Vec<Transaction>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, accountNo, expenseType, amount, date FROM transactions ORDER BY date ASC, id ASC",
        )?;
        let rows = stmt.query_map([], transaction_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// The `limit` most recent entries, returned oldest first.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Transaction>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, accountNo, expenseType, amount, date FROM (
                SELECT id, accountNo, expenseType, amount, date FROM transactions
                ORDER BY date DESC, id DESC
                LIMIT ?1
            )
            ORDER BY date ASC, id ASC
            "#,
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], transaction_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let expense_type: String = row.get(2)?;
    let expense_type = ExpenseType::from_str(&expense_type)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;
    let millis: i64 = row.get(4)?;
    let date = DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, millis))?;

    Ok(Transaction {
        id: Some(row.get(0)?),
        date,
        account_no: row.get(1)?,
        expense_type,
        amount: row.get(3)?,
    })
}
