//! Spendbook CLI entry point.
//!
//! Manages accounts and the income/expense log stored in the local database.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use spendbook::data::{PersistentAccountRepository, PersistentTransactionRepository};
use spendbook::domain::{AccountError, ExpenseError};
use spendbook::infra::app_config;
use spendbook::{Database, ExpenseManager, ExpenseType, Transaction};

#[derive(Parser, Debug)]
#[command(name = "spendbook")]
#[command(version)]
#[command(about = "Track bank accounts and their income and expenses", long_about = None)]
struct Args {
    /// Database file to use instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new account
    AddAccount {
        account_no: String,
        bank_name: String,
        holder_name: String,
        #[arg(allow_negative_numbers = true, value_parser = parse_balance)]
        balance: f64,
    },

    /// List all accounts
    Accounts,

    /// Remove an account (its logged transactions are kept)
    RemoveAccount { account_no: String },

    /// Record an income or expense and update the account balance
    Record {
        account_no: String,
        #[arg(value_enum)]
        kind: Kind,
        amount: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the transaction log, oldest first
    Logs {
        /// Only the N most recent entries
        #[arg(short, long, conflicts_with = "all")]
        limit: Option<usize>,
        /// Show the whole log
        #[arg(long)]
        all: bool,
    },

    /// Drop and recreate all tables
    Reset,

    /// Show the configuration, or change and save it
    Config {
        /// Number of log entries shown by `logs`
        #[arg(long)]
        page_size: Option<usize>,
        /// Database file name inside the data directory
        #[arg(long)]
        database_name: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Income,
    Expense,
}

impl From<Kind> for ExpenseType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Income => ExpenseType::Income,
            Kind::Expense => ExpenseType::Expense,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(ExpenseError::Account(AccountError::InvalidAccount(_))) =
                err.downcast_ref::<ExpenseError>()
            {
                eprintln!("{}", err);
                return ExitCode::from(2);
            }
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = app_config::load_config();
    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| app_config::database_path(&config));

    match args.command {
        Commands::AddAccount {
            account_no,
            bank_name,
            holder_name,
            balance,
        } => {
            let db = open_database(&db_path)?;
            manager(&db, &config).add_account(&account_no, &bank_name, &holder_name, balance)?;
            println!("Added account {}", account_no);
        }
        Commands::Accounts => {
            let db = open_database(&db_path)?;
            let accounts = manager(&db, &config).accounts()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&accounts)?);
            } else if accounts.is_empty() {
                println!("No accounts.");
            } else {
                for account in accounts {
                    println!(
                        "{:<12} {:<20} {:<24} {:>12.2}",
                        account.account_no,
                        account.bank_name,
                        account.account_holder_name,
                        account.balance
                    );
                }
            }
        }
        Commands::RemoveAccount { account_no } => {
            let db = open_database(&db_path)?;
            manager(&db, &config).remove_account(&account_no)?;
            println!("Removed account {}", account_no);
        }
        Commands::Record {
            account_no,
            kind,
            amount,
            date,
        } => {
            let db = open_database(&db_path)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let recorded = manager(&db, &config).update_account_balance(
                &account_no,
                date,
                kind.into(),
                &amount,
            )?;
            match recorded {
                Some(transaction) => print_transactions(&[transaction], args.json)?,
                None => println!("Nothing recorded: empty amount."),
            }
        }
        Commands::Logs { limit, all } => {
            let db = open_database(&db_path)?;
            let manager = manager(&db, &config);
            let logs = if all {
                manager.all_transaction_logs()?
            } else if let Some(limit) = limit {
                manager.recent_transaction_logs(limit)?
            } else {
                manager.transaction_logs()?
            };
            print_transactions(&logs, args.json)?;
        }
        Commands::Reset => {
            open_database(&db_path)?.reset()?;
            println!("Database reset at {}", db_path.display());
        }
        Commands::Config {
            page_size,
            database_name,
        } => {
            if page_size.is_some() || database_name.is_some() {
                if let Some(page_size) = page_size {
                    config.default_page_size = page_size;
                }
                if let Some(name) = database_name {
                    config.database_name = name;
                }
                app_config::save_config(&config).context("Could not save config")?;
            }
            print!("{}", toml::to_string_pretty(&config)?);
            println!("# database: {}", app_config::database_path(&config).display());
        }
    }

    Ok(())
}

/// The store is only opened by commands that read or write it.
fn open_database(path: &Path) -> Result<Database> {
    Database::open_at(path.to_path_buf())
        .with_context(|| format!("Could not open {}", path.display()))
}

fn manager(
    db: &Database,
    config: &app_config::AppConfig,
) -> ExpenseManager<PersistentAccountRepository, PersistentTransactionRepository> {
    ExpenseManager::persistent(db).with_page_size(config.default_page_size)
}

/// Opening balances must be finite numbers; `NaN` and `inf` parse as `f64`.
fn parse_balance(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", s))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("`{}` is not a finite number", s))
    }
}

fn print_transactions(transactions: &[Transaction], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(transactions)?);
        return Ok(());
    }
    if transactions.is_empty() {
        println!("No transactions.");
    }
    for transaction in transactions {
        println!(
            "{}  {:<12} {:<8} {:>12.2}",
            transaction.date.format("%Y-%m-%d"),
            transaction.account_no,
            transaction.expense_type.to_string(),
            transaction.amount
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance_accepts_signed_numbers() {
        assert_eq!(parse_balance("250.5"), Ok(250.5));
        assert_eq!(parse_balance("-40"), Ok(-40.0));
    }

    #[test]
    fn test_parse_balance_rejects_non_finite_values() {
        assert!(parse_balance("NaN").is_err());
        assert!(parse_balance("inf").is_err());
        assert!(parse_balance("-infinity").is_err());
        assert!(parse_balance("abc").is_err());
    }

    #[test]
    fn test_add_account_rejects_nan_balance_on_command_line() {
        let parsed = Args::try_parse_from(["spendbook", "add-account", "A1", "Bank", "Holder", "NaN"]);
        assert!(parsed.is_err());

        let parsed = Args::try_parse_from(["spendbook", "add-account", "A1", "Bank", "Holder", "-5"]);
        assert!(parsed.is_ok());
    }
}
