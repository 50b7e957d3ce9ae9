use super::{AccountRepository, TransactionRepository};
use crate::domain::{Account, AccountError, AccountNo, ExpenseType, Transaction, TransactionError};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> anyhow::Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|e| anyhow::anyhow!("in-memory lock: {}", e))
}

/// Non-persistent accounts, kept in insertion order.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn account_numbers(&self) -> Result<Vec<AccountNo>, AccountError> {
        let accounts = lock(&self.accounts)?;
        Ok(accounts.iter().map(|a| a.account_no.clone()).collect())
    }

    fn accounts(&self) -> Result<Vec<Account>, AccountError> {
        Ok(lock(&self.accounts)?.clone())
    }

    fn get_account(&self, account_no: &str) -> Result<Account, AccountError> {
        lock(&self.accounts)?
            .iter()
            .find(|a| a.account_no == account_no)
            .cloned()
            .ok_or_else(|| AccountError::invalid(account_no))
    }

    fn add_account(&self, account: &Account) -> Result<(), AccountError> {
        AccountError::ensure_finite(&account.account_no, account.balance)?;
        let mut accounts = lock(&self.accounts)?;
        if accounts.iter().any(|a| a.account_no == account.account_no) {
            log::warn!(
                "Account {} already exists, keeping the stored one",
                account.account_no
            );
        } else {
            accounts.push(account.clone());
        }
        Ok(())
    }

    fn remove_account(&self, account_no: &str) -> Result<(), AccountError> {
        let mut accounts = lock(&self.accounts)?;
        let before = accounts.len();
        accounts.retain(|a| a.account_no != account_no);
        if accounts.len() == before {
            return Err(AccountError::invalid(account_no));
        }
        Ok(())
    }

    fn update_balance(
        &self,
        account_no: &str,
        expense_type: ExpenseType,
        amount: f64,
    ) -> Result<(), AccountError> {
        AccountError::ensure_finite(account_no, amount)?;
        let mut accounts = lock(&self.accounts)?;
        let account = accounts
            .iter_mut()
            .find(|a| a.account_no == account_no)
            .ok_or_else(|| AccountError::invalid(account_no))?;
        account.balance += expense_type.signed(amount);
        Ok(())
    }
}

/// Non-persistent transaction log.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    log: Mutex<Vec<Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log sorted by date; the sort is stable so equal dates keep insertion order.
    fn sorted(&self) -> anyhow::Result<Vec<Transaction>> {
        let mut log = lock(&self.log)?.clone();
        log.sort_by_key(|t| t.date);
        Ok(log)
    }
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn log_transaction(
        &self,
        date: DateTime<Utc>,
        account_no: &str,
        expense_type: ExpenseType,
        amount: f64,
    ) -> Result<Transaction, TransactionError> {
        let mut log = lock(&self.log)?;
        let mut transaction = Transaction::new(date, account_no, expense_type, amount);
        transaction.id = Some(log.len() as i64 + 1);
        log.push(transaction.clone());
        Ok(transaction)
    }

    fn all_transaction_logs(&self) -> Result<Vec<Transaction>, TransactionError> {
        Ok(self.sorted()?)
    }

    fn paginated_transaction_logs(
        &self,
        limit: usize,
    ) -> Result<Vec<Transaction>, TransactionError> {
        let mut log = self.sorted()?;
        let skip = log.len().saturating_sub(limit);
        Ok(log.split_off(skip))
    }
}
