use super::AccountNo;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a logged transaction.
pub type TransactionId = i64;

/// Direction of a transaction relative to the account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    Expense,
    Income,
}

impl ExpenseType {
    /// Signed balance delta for a transaction of `amount`.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Self::Expense => -amount,
            Self::Income => amount,
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "EXPENSE"),
            Self::Income => write!(f, "INCOME"),
        }
    }
}

impl FromStr for ExpenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXPENSE" => Ok(Self::Expense),
            "INCOME" => Ok(Self::Income),
            other => Err(format!("Unknown expense type: {other}")),
        }
    }
}

/// An immutable entry in the transaction log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// `None` until the transaction has been persisted.
    pub id: Option<TransactionId>,
    pub date: DateTime<Utc>,
    /// Logical reference to an account. Not guaranteed to exist.
    pub account_no: AccountNo,
    pub expense_type: ExpenseType,
    pub amount: f64,
}

impl Transaction {
    /// Build an unsaved transaction. The date is truncated to whole
    /// milliseconds, the precision the log keeps.
    pub fn new(
        date: DateTime<Utc>,
        account_no: impl Into<AccountNo>,
        expense_type: ExpenseType,
        amount: f64,
    ) -> Self {
        Self {
            id: None,
            date: date.trunc_subsecs(3),
            account_no: account_no.into(),
            expense_type,
            amount,
        }
    }
}
