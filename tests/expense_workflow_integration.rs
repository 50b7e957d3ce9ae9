//! Integration tests for the expense tracking workflow
//! These tests drive the repositories and the manager through a real SQLite store.

use chrono::{NaiveDate, TimeZone, Utc};
use spendbook::data::{
    AccountRepository, PersistentAccountRepository, PersistentTransactionRepository,
    TransactionRepository,
};
use spendbook::domain::{Account, AccountError, ExpenseError, ExpenseType};
use spendbook::infra::db::Database;
use spendbook::ExpenseManager;
use tempfile::TempDir;

#[test]
fn test_account_lifecycle_scenario() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let accounts = PersistentAccountRepository::from_database(&db);

    accounts.add_account(&Account::new("A1", "BankX", "Holder", 100.0))?;
    assert_eq!(accounts.get_account("A1")?.balance, 100.0);

    accounts.update_balance("A1", ExpenseType::Income, 50.0)?;
    assert_eq!(accounts.get_account("A1")?.balance, 150.0);

    accounts.update_balance("A1", ExpenseType::Expense, 30.0)?;
    assert_eq!(accounts.get_account("A1")?.balance, 120.0);

    accounts.remove_account("A1")?;
    let err = accounts.get_account("A1").unwrap_err();
    assert!(matches!(err, AccountError::InvalidAccount(ref no) if no == "A1"));

    Ok(())
}

#[test]
fn test_gateway_absence_vs_repository_error() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;

    // the store reports absence without failing
    assert!(db.account_store().find_by_no("missing")?.is_none());
    assert!(!db.account_store().delete("missing")?);

    // the repository turns it into an explicit error
    let accounts = PersistentAccountRepository::from_database(&db);
    assert!(accounts.get_account("missing").unwrap_err().is_invalid_account());
    assert!(accounts.remove_account("missing").unwrap_err().is_invalid_account());

    Ok(())
}

#[test]
fn test_transaction_history_ordering() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let transactions = PersistentTransactionRepository::from_database(&db);

    let t1 = Utc.with_ymd_and_hms(2022, 1, 1, 9, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2022, 1, 2, 9, 0, 0).unwrap();
    let t3 = Utc.with_ymd_and_hms(2022, 1, 3, 9, 0, 0).unwrap();

    transactions.log_transaction(t3, "A1", ExpenseType::Expense, 30.0)?;
    transactions.log_transaction(t1, "A1", ExpenseType::Income, 10.0)?;
    transactions.log_transaction(t2, "A1", ExpenseType::Expense, 20.0)?;

    let all: Vec<_> = transactions
        .all_transaction_logs()?
        .into_iter()
        .map(|t| t.date)
        .collect();
    assert_eq!(all, vec![t1, t2, t3]);

    let page: Vec<_> = transactions
        .paginated_transaction_logs(2)?
        .into_iter()
        .map(|t| t.date)
        .collect();
    assert_eq!(page, vec![t2, t3]);

    Ok(())
}

#[test]
fn test_orphan_and_dangling_log_entries() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let accounts = PersistentAccountRepository::from_database(&db);
    let transactions = PersistentTransactionRepository::from_database(&db);
    let now = Utc::now();

    // logging against an account that never existed succeeds
    transactions.log_transaction(now, "nobody", ExpenseType::Expense, 5.0)?;

    // removing an account leaves its entries in place
    accounts.add_account(&Account::new("43210T", "Bank002", "Holder002", 1000.0))?;
    transactions.log_transaction(now, "43210T", ExpenseType::Income, 500.0)?;
    accounts.remove_account("43210T")?;

    let numbers: Vec<_> = transactions
        .all_transaction_logs()?
        .into_iter()
        .map(|t| t.account_no)
        .collect();
    assert_eq!(numbers, vec!["nobody".to_string(), "43210T".to_string()]);

    Ok(())
}

#[test]
fn test_manager_records_through_store_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let date = NaiveDate::from_ymd_opt(2022, 2, 1).unwrap();

    {
        let db = Database::open_named(dir.path(), "expenses.sqlite")?;
        let manager = ExpenseManager::persistent(&db);
        manager.add_account("72839U", "Bank001", "Holder001", 1000.0)?;
        let before = manager.transaction_logs()?.len();

        manager.update_account_balance("72839U", date, ExpenseType::Income, "2000")?;
        assert_eq!(manager.transaction_logs()?.len(), before + 1);
    }

    // state survives reopening the store
    let db = Database::open_named(dir.path(), "expenses.sqlite")?;
    let manager = ExpenseManager::persistent(&db);
    let account = manager.accounts_repository().get_account("72839U")?;
    assert_eq!(account.balance, 3000.0);

    let logs = manager.all_transaction_logs()?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].date.date_naive(), date);
    assert_eq!(logs[0].expense_type, ExpenseType::Income);

    let err = manager
        .update_account_balance("missing", date, ExpenseType::Expense, "1")
        .unwrap_err();
    assert!(matches!(
        err,
        ExpenseError::Account(AccountError::InvalidAccount(_))
    ));

    Ok(())
}
