// 💳 Account Entity - one node of the chart of accounts
//
// The code is the identity, the name is a second unique key, and the
// parent is stored as a code (key into the owning chart), never as a
// pointer. The chart is the only owner of Account values.

use crate::error::{EntrySide, LedgerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, equipment)
    Asset,

    /// Obligations owed to others
    Liability,

    /// Owner's residual interest (capital, retained earnings)
    Equity,

    /// Income earned in the period (temporary)
    Revenue,

    /// Costs incurred in the period (temporary)
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Revenue,
        AccountType::Expense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
        }
    }

    /// Revenue and expense accounts are zeroed at period end.
    pub fn is_temporary(&self) -> bool {
        matches!(self, AccountType::Revenue | AccountType::Expense)
    }

    /// The side on which this type naturally increases.
    ///
    /// Only used for presentation; the engine itself stores every balance
    /// as debit-positive / credit-negative.
    pub fn normal_side(&self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense => EntrySide::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                EntrySide::Credit
            }
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        AccountType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| LedgerError::InvalidAccountType(s.to_string()))
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

/// A single account in the chart.
///
/// Fields are private: an Account is only created through
/// [`ChartOfAccounts::add_account`](crate::chart::ChartOfAccounts::add_account)
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    code: String,
    name: String,
    account_type: AccountType,
    parent_code: Option<String>,
}

impl Account {
    pub(crate) fn new(
        code: String,
        name: String,
        account_type: AccountType,
        parent_code: Option<String>,
    ) -> Self {
        Account {
            code,
            name,
            account_type,
            parent_code,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Code of the parent account, if this is not a top-level account.
    pub fn parent_code(&self) -> Option<&str> {
        self.parent_code.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parent_code.is_none()
    }

    pub fn to_record(&self) -> AccountRecord {
        AccountRecord {
            code: self.code.clone(),
            name: self.name.clone(),
            account_type: self.account_type,
            parent_code: self.parent_code.clone(),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.code, self.name, self.account_type)
    }
}

// ============================================================================
// PERSISTED FORM
// ============================================================================

/// On-disk shape of an account: `{code, name, account_type, parent_code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub parent_code: Option<String>,
}

// ============================================================================
// TESTS
// ============================================================================
