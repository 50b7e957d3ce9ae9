//! Application layer (use-cases, policies).
//!
//! Orchestrates the repositories without depending on how they persist.

pub mod expense_manager;

pub use expense_manager::ExpenseManager;
