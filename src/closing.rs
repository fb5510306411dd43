// 🔒 Period-End Closer - zero temporary accounts into retained earnings
//
// Posting order is fixed: every revenue closing first, then every expense
// closing, each group in chart code order. The caller must recompute any
// engine it reports from afterwards.

use crate::engine::ComputationalEngine;
use crate::entities::{Account, AccountType, Transaction};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::GeneralJournal;
use tracing::info;

pub struct PeriodEndCloser<'j, 'c> {
    journal: &'j mut GeneralJournal<'c>,
    retained_earnings: Account,
}

impl<'j, 'c> PeriodEndCloser<'j, 'c> {
    /// Fails with `InvalidClosingAccount` unless the target is an equity account.
    pub fn new(
        journal: &'j mut GeneralJournal<'c>,
        retained_earnings: &Account,
    ) -> LedgerResult<Self> {
        if retained_earnings.account_type() != AccountType::Equity {
            return Err(LedgerError::InvalidClosingAccount(
                retained_earnings.name().to_string(),
            ));
        }

        Ok(PeriodEndCloser {
            journal,
            retained_earnings: retained_earnings.clone(),
        })
    }

    /// Post closing entries for every revenue and expense account with a
    /// nonzero balance. Returns the entries that were posted.
    pub fn run_closing_entries(&mut self) -> LedgerResult<Vec<Transaction>> {
        let chart = self.journal.chart();
        let closings = {
            let mut engine = ComputationalEngine::new(&*self.journal);
            engine.compute_balances();

            let mut closings = Vec::new();

            // Revenue carries a credit (negative) balance: debit it back to zero
            for account in chart.iter().filter(|a| a.account_type() == AccountType::Revenue) {
                let balance = engine.get_balance(account.name());
                if balance != 0.0 {
                    closings.push(Transaction::new(
                        account,
                        &self.retained_earnings,
                        balance.abs(),
                    ));
                }
            }

            // Expense carries a debit (positive) balance: credit it back to zero
            for account in chart.iter().filter(|a| a.account_type() == AccountType::Expense) {
                let balance = engine.get_balance(account.name());
                if balance != 0.0 {
                    closings.push(Transaction::new(
                        &self.retained_earnings,
                        account,
                        balance,
                    ));
                }
            }

            closings
        };

        for txn in &closings {
            self.journal.record_entry(txn.clone())?;
        }

        info!(
            retained_earnings = self.retained_earnings.name(),
            entries = closings.len(),
            "period closed"
        );
        Ok(closings)
    }
}

// ============================================================================
// TESTS
// ============================================================================
