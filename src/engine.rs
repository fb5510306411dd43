// 🧮 Computational Engine - turns journal entries into balances
//
// Convention: debits add, credits subtract, for every account type.
// The ledger is always rebuilt from the full journal; there is no
// incremental update path.

use crate::entities::Transaction;
use crate::journal::GeneralJournal;
use std::collections::BTreeMap;
use tracing::debug;

/// Default tolerance for "is this zero" checks on summed balances.
pub const BALANCE_TOLERANCE: f64 = 1e-9;

pub struct ComputationalEngine<'j> {
    entries: &'j [Transaction],

    /// Account name → signed balance, ordered so sums are reproducible
    ledger: BTreeMap<String, f64>,
}

impl<'j> ComputationalEngine<'j> {
    pub fn new(journal: &'j GeneralJournal<'_>) -> Self {
        ComputationalEngine {
            entries: journal.entries(),
            ledger: BTreeMap::new(),
        }
    }

    /// Rebuild every balance from scratch. Safe to call repeatedly.
    pub fn compute_balances(&mut self) {
        self.ledger.clear();
        for txn in self.entries {
            *self.ledger.entry(txn.debit.name().to_string()).or_insert(0.0) += txn.amount;
            *self.ledger.entry(txn.credit.name().to_string()).or_insert(0.0) -= txn.amount;
        }
        debug!(
            entries = self.entries.len(),
            accounts = self.ledger.len(),
            "balances computed"
        );
    }

    /// Balance of an account, or 0 if it never appeared in a transaction.
    pub fn get_balance(&self, account_name: &str) -> f64 {
        self.ledger.get(account_name).copied().unwrap_or(0.0)
    }

    /// Sum of every balance in account-name order. Zero (within tolerance) for
    /// any well-formed journal, and bit-identical across runs.
    pub fn trial_balance(&self) -> f64 {
        self.ledger.values().sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.trial_balance().abs() <= BALANCE_TOLERANCE
    }

    pub fn balances(&self) -> &BTreeMap<String, f64> {
        &self.ledger
    }
}

// ============================================================================
// TESTS
// ============================================================================
