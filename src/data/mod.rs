//! Repository tier: domain-facing account and transaction operations.
//!
//! Implementations sit on top of the SQLite stores (`persistent`) or keep
//! everything in process memory (`in_memory`). Both follow the same
//! contract, including its leniencies: adding an existing account number is
//! a silent no-op and transactions may reference unknown accounts.

mod in_memory;
mod persistent;

pub use in_memory::{InMemoryAccountRepository, InMemoryTransactionRepository};
pub use persistent::{PersistentAccountRepository, PersistentTransactionRepository};

use crate::domain::{Account, AccountError, AccountNo, ExpenseType, Transaction, TransactionError};
use chrono::{DateTime, Utc};

/// Account operations. `InvalidAccount` is raised by `get_account`,
/// `remove_account` and `update_balance` when the account does not exist.
/// `add_account` and `update_balance` reject NaN and infinite values with
/// `NonFiniteAmount`.
pub trait AccountRepository: Send + Sync {
    fn account_numbers(&self) -> Result<Vec<AccountNo>, AccountError>;

    fn accounts(&self) -> Result<Vec<Account>, AccountError>;

    fn get_account(&self, account_no: &str) -> Result<Account, AccountError>;

    /// Adding an account number that already exists leaves the stored
    /// account unchanged and is not reported as an error.
    fn add_account(&self, account: &Account) -> Result<(), AccountError>;

    fn remove_account(&self, account_no: &str) -> Result<(), AccountError>;

    /// Subtract `amount` for an expense, add it for an income.
    /// `amount` is not validated; a negative value moves the balance the
    /// other way.
    fn update_balance(
        &self,
        account_no: &str,
        expense_type: ExpenseType,
        amount: f64,
    ) -> Result<(), AccountError>;
}

/// Append-only transaction log.
pub trait TransactionRepository: Send + Sync {
    /// Record a transaction. The account number is not checked.
    fn log_transaction(
        &self,
        date: DateTime<Utc>,
        account_no: &str,
        expense_type: ExpenseType,
        amount: f64,
    ) -> Result<Transaction, TransactionError>;

    /// Every logged transaction, oldest first.
    fn all_transaction_logs(&self) -> Result<Vec<Transaction>, TransactionError>;

    /// The `limit` most recent transactions, oldest first.
    fn paginated_transaction_logs(
        &self,
        limit: usize,
    ) -> Result<Vec<Transaction>, TransactionError>;
}
