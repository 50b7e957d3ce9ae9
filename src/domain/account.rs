use serde::{Deserialize, Serialize};

/// Account number, the primary key of an account.
pub type AccountNo = String;

/// A bank account with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Unique, immutable account number.
    pub account_no: AccountNo,
    pub bank_name: String,
    pub account_holder_name: String,
    /// Current balance. Only changed through a balance update.
    pub balance: f64,
}

impl Account {
    pub fn new(
        account_no: impl Into<AccountNo>,
        bank_name: impl Into<String>,
        account_holder_name: impl Into<String>,
        balance: f64,
    ) -> Self {
        Self {
            account_no: account_no.into(),
            bank_name: bank_name.into(),
            account_holder_name: account_holder_name.into(),
            balance,
        }
    }
}
