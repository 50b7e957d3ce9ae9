//! Domain error types for Spendbook.
//!
//! The storage layer reports absence as `None`/`false` and infrastructure
//! failures as `anyhow::Error`. These enums are where absence becomes an
//! explicit, matchable failure.

use thiserror::Error;

/// Errors raised by account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account {0} is invalid.")]
    InvalidAccount(String),

    #[error("Amount {value} for account {account_no} is not a finite number")]
    NonFiniteAmount { account_no: String, value: f64 },

    #[error("Account storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AccountError {
    pub fn invalid(account_no: &str) -> Self {
        Self::InvalidAccount(account_no.to_string())
    }

    /// Balances and amounts must be finite; SQLite cannot store NaN.
    pub fn ensure_finite(account_no: &str, value: f64) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NonFiniteAmount {
                account_no: account_no.to_string(),
                value,
            })
        }
    }

    pub fn is_invalid_account(&self) -> bool {
        matches!(self, Self::InvalidAccount(_))
    }
}

/// Errors raised by transaction log operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Transaction storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Errors surfaced by the expense manager use-cases.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
