use super::{AccountRepository, TransactionRepository};
use crate::domain::{Account, AccountError, AccountNo, ExpenseType, Transaction, TransactionError};
use crate::infra::db::{AccountStore, Database, TransactionStore};
use chrono::{DateTime, Utc};

/// Accounts backed by the `accounts` table.
#[derive(Clone)]
pub struct PersistentAccountRepository {
    store: AccountStore,
}

impl PersistentAccountRepository {
    pub fn new(store: AccountStore) -> Self {
        Self { store }
    }

    pub fn from_database(db: &Database) -> Self {
        Self::new(db.account_store())
    }
}

impl AccountRepository for PersistentAccountRepository {
    fn account_numbers(&self) -> Result<Vec<AccountNo>, AccountError> {
        Ok(self.store.list_numbers()?)
    }

    fn accounts(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.store.list_all()?)
    }

    fn get_account(&self, account_no: &str) -> Result<Account, AccountError> {
        self.store
            .find_by_no(account_no)?
            .ok_or_else(|| AccountError::invalid(account_no))
    }

    fn add_account(&self, account: &Account) -> Result<(), AccountError> {
        AccountError::ensure_finite(&account.account_no, account.balance)?;
        if self.store.insert(account)? {
            return Ok(());
        }
        // INSERT OR IGNORE also skips rows failing other constraints
        if self.store.find_by_no(&account.account_no)?.is_none() {
            let err = anyhow::anyhow!("account {} was not stored", account.account_no);
            return Err(err.into());
        }
        log::warn!(
            "Account {} already exists, keeping the stored one",
            account.account_no
        );
        Ok(())
    }

    fn remove_account(&self, account_no: &str) -> Result<(), AccountError> {
        if self.store.delete(account_no)? {
            Ok(())
        } else {
            Err(AccountError::invalid(account_no))
        }
    }

    fn update_balance(
        &self,
        account_no: &str,
        expense_type: ExpenseType,
        amount: f64,
    ) -> Result<(), AccountError> {
        AccountError::ensure_finite(account_no, amount)?;
        // single UPDATE statement, no read-then-write window
        if self
            .store
            .adjust_balance(account_no, expense_type.signed(amount))?
        {
            Ok(())
        } else {
            Err(AccountError::invalid(account_no))
        }
    }
}

/// Transaction log backed by the `transactions` table.
#[derive(Clone)]
pub struct PersistentTransactionRepository {
    store: TransactionStore,
}

impl PersistentTransactionRepository {
    pub fn new(store: TransactionStore) -> Self {
        Self { store }
    }

    pub fn from_database(db: &Database) -> Self {
        Self::new(db.transaction_store())
    }
}

impl TransactionRepository for PersistentTransactionRepository {
    fn log_transaction(
        &self,
        date: DateTime<Utc>,
        account_no: &str,
        expense_type: ExpenseType,
        amount: f64,
    ) -> Result<Transaction, TransactionError> {
        let mut transaction = Transaction::new(date, account_no, expense_type, amount);
        transaction.id = Some(self.store.insert(&transaction)?);
        Ok(transaction)
    }

    fn all_transaction_logs(&self) -> Result<Vec<Transaction>, TransactionError> {
        Ok(self.store.list_all()?)
    }

    fn paginated_transaction_logs(
        &self,
        limit: usize,
    ) -> Result<Vec<Transaction>, TransactionError> {
        Ok(self.store.list_recent(limit)?)
    }
}
