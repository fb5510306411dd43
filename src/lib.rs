// Symbolic Ledger - Core Library
// Double-entry bookkeeping: chart of accounts, journal, balances, reports, closing.
// Exposes all modules for use by the CLI and by tests.

pub mod entities;
pub mod error;
pub mod chart;
pub mod journal;
pub mod engine;
pub mod reports;
pub mod closing;
pub mod import;
pub mod config;
pub mod db;
pub mod workspace;

// Re-export commonly used types
pub use entities::{Account, AccountRecord, AccountType, Transaction, TransactionRecord};
pub use error::{EntrySide, LedgerError, LedgerResult};
pub use chart::ChartOfAccounts;
pub use journal::{GeneralJournal, SalesJournal};
pub use engine::{ComputationalEngine, BALANCE_TOLERANCE};
pub use reports::{
    BalanceSheet, FinancialRatios, FinancialReporter, IncomeStatement, IncomeStatementLine,
    TrialBalanceRow,
};
pub use closing::PeriodEndCloser;
pub use import::{load_csv, post_entries, post_transactions_from_csv, read_csv, CsvEntry};
pub use config::{Config, StorageBackend};
pub use workspace::Workspace;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
