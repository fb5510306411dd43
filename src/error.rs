// 🚨 Ledger Errors - every failure the bookkeeping core can raise
//
// All domain variants are caller data errors (bad code, bad reference,
// wrong account type). None of them are retried; they go straight back
// to whoever supplied the data.

use std::fmt;
use thiserror::Error;

/// Which side of a transaction an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySide {
    Debit,
    Credit,
}

impl fmt::Display for EntrySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySide::Debit => write!(f, "debit"),
            EntrySide::Credit => write!(f, "credit"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    // ========================================================================
    // CHART OF ACCOUNTS
    // ========================================================================
    #[error("Account with code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Account with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Parent account with code '{0}' does not exist")]
    UnknownParent(String),

    #[error("Account '{0}' is its own ancestor")]
    CyclicParent(String),

    #[error("Account with identifier '{0}' not found")]
    AccountNotFound(String),

    #[error("Invalid account type: '{0}'")]
    InvalidAccountType(String),

    // ========================================================================
    // JOURNAL
    // ========================================================================
    #[error("Unknown {side} account '{identifier}'")]
    UnknownAccount {
        side: EntrySide,
        identifier: String,
    },

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("Sales journal account '{account}' must be of type {expected}")]
    InvalidSalesAccount {
        account: String,
        expected: &'static str,
    },

    // ========================================================================
    // CLOSING
    // ========================================================================
    #[error("Closing account '{0}' must be of type equity (e.g. Retained Earnings)")]
    InvalidClosingAccount(String),

    // ========================================================================
    // STORAGE
    // ========================================================================
    #[error("Workspace not initialized: {0}")]
    WorkspaceNotInitialized(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
