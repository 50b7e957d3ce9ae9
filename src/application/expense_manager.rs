//! Use-cases behind the account and transaction screens.

use crate::data::{
    AccountRepository, PersistentAccountRepository, PersistentTransactionRepository,
    TransactionRepository,
};
use crate::domain::{Account, AccountNo, ExpenseError, ExpenseType, Transaction};
use crate::infra::db::Database;
use chrono::{NaiveDate, NaiveTime};

const DEFAULT_PAGE_SIZE: usize = 10;

/// Facade combining an account repository and a transaction log.
pub struct ExpenseManager<A, T> {
    accounts: A,
    transactions: T,
    page_size: usize,
}

impl ExpenseManager<PersistentAccountRepository, PersistentTransactionRepository> {
    /// Manager backed by the SQLite store.
    pub fn persistent(db: &Database) -> Self {
        Self::new(
            PersistentAccountRepository::from_database(db),
            PersistentTransactionRepository::from_database(db),
        )
    }
}

impl<A: AccountRepository, T: TransactionRepository> ExpenseManager<A, T> {
    pub fn new(accounts: A, transactions: T) -> Self {
        Self {
            accounts,
            transactions,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Number of entries returned by [`Self::transaction_logs`].
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn accounts_repository(&self) -> &A {
        &self.accounts
    }

    pub fn transactions_repository(&self) -> &T {
        &self.transactions
    }

    pub fn add_account(
        &self,
        account_no: &str,
        bank_name: &str,
        account_holder_name: &str,
        balance: f64,
    ) -> Result<(), ExpenseError> {
        let account = Account::new(account_no, bank_name, account_holder_name, balance);
        self.accounts.add_account(&account)?;
        Ok(())
    }

    pub fn account_numbers(&self) -> Result<Vec<AccountNo>, ExpenseError> {
        Ok(self.accounts.account_numbers()?)
    }

    pub fn accounts(&self) -> Result<Vec<Account>, ExpenseError> {
        Ok(self.accounts.accounts()?)
    }

    pub fn remove_account(&self, account_no: &str) -> Result<(), ExpenseError> {
        Ok(self.accounts.remove_account(account_no)?)
    }

    /// Apply a user-entered amount to an account and record it in the log.
    ///
    /// A blank amount does nothing. The balance is updated first, so an
    /// unknown account fails with `InvalidAccount` and nothing is logged.
    /// If the log write then fails, the balance change is reverted with the
    /// opposite adjustment before the error is returned.
    /// Returns the logged transaction, if any.
    pub fn update_account_balance(
        &self,
        account_no: &str,
        date: NaiveDate,
        expense_type: ExpenseType,
        amount: &str,
    ) -> Result<Option<Transaction>, ExpenseError> {
        let amount = amount.trim();
        if amount.is_empty() {
            return Ok(None);
        }
        let amount = parse_amount(amount)?;

        self.accounts
            .update_balance(account_no, expense_type, amount)?;
        let date = date.and_time(NaiveTime::MIN).and_utc();
        match self
            .transactions
            .log_transaction(date, account_no, expense_type, amount)
        {
            Ok(transaction) => Ok(Some(transaction)),
            Err(err) => {
                if let Err(undo) = self
                    .accounts
                    .update_balance(account_no, expense_type, -amount)
                {
                    log::error!(
                        "Failed to revert balance of {} after log write failed: {}",
                        account_no,
                        undo
                    );
                }
                Err(err.into())
            }
        }
    }

    /// The most recent page of the log, oldest first.
    pub fn transaction_logs(&self) -> Result<Vec<Transaction>, ExpenseError> {
        self.recent_transaction_logs(self.page_size)
    }

    pub fn recent_transaction_logs(&self, limit: usize) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self.transactions.paginated_transaction_logs(limit)?)
    }

    pub fn all_transaction_logs(&self) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self.transactions.all_transaction_logs()?)
    }
}

fn parse_amount(amount: &str) -> Result<f64, ExpenseError> {
    let value: f64 = amount
        .parse()
        .map_err(|_| ExpenseError::InvalidAmount(amount.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ExpenseError::InvalidAmount(amount.to_string()));
    }
    Ok(value)
}
