//! Domain types for Spendbook
//! Accounts, the transaction log and the errors raised around them.

pub mod account;
pub mod error;
pub mod transaction;

pub use account::*;
pub use error::*;
pub use transaction::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_expense_type_display_parse() {
        assert_eq!(ExpenseType::Expense.to_string(), "EXPENSE");
        assert_eq!(ExpenseType::Income.to_string(), "INCOME");
        assert_eq!(
            ExpenseType::from_str("income").unwrap(),
            ExpenseType::Income
        );
        assert_eq!(
            ExpenseType::from_str(" EXPENSE ").unwrap(),
            ExpenseType::Expense
        );
        assert!(ExpenseType::from_str("transfer").is_err());
    }

    #[test]
    fn test_expense_type_signed() {
        assert_eq!(ExpenseType::Income.signed(50.0), 50.0);
        assert_eq!(ExpenseType::Expense.signed(30.0), -30.0);
        // negative amounts flip direction, no validation happens here
        assert_eq!(ExpenseType::Expense.signed(-30.0), 30.0);
    }

    #[test]
    fn test_invalid_account_message() {
        let err = AccountError::invalid("A1");
        assert!(err.is_invalid_account());
        assert_eq!(err.to_string(), "Account A1 is invalid.");

        let storage = AccountError::from(anyhow::anyhow!("disk I/O error"));
        assert!(!storage.is_invalid_account());
    }

    #[test]
    fn test_transaction_date_truncated_to_millis() {
        use chrono::{TimeZone, Timelike, Utc};

        let date = Utc.timestamp_opt(1_650_000_000, 123_456_789).unwrap();
        let transaction = Transaction::new(date, "A1", ExpenseType::Income, 1.0);
        assert_eq!(transaction.date.nanosecond(), 123_000_000);
        assert_eq!(transaction.date.timestamp_millis(), date.timestamp_millis());
    }

    #[test]
    fn test_expense_type_serde_uses_stored_names() {
        let json = serde_json::to_string(&ExpenseType::Income).unwrap();
        assert_eq!(json, "\"INCOME\"");
    }
}
