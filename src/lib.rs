pub mod application;
pub mod data;
pub mod domain;
pub mod infra;

pub use application::ExpenseManager;
pub use data::{AccountRepository, TransactionRepository};
pub use domain::{Account, AccountError, ExpenseType, Transaction};
pub use infra::db::Database;
