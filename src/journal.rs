// 📒 General Journal - the book of original entry
//
// Append-only, order-preserving list of transactions, bound to one chart.
// Accounts are validated when an entry is recorded and never re-checked.

use crate::chart::ChartOfAccounts;
use crate::entities::{Account, AccountType, Transaction, TransactionRecord};
use crate::error::{EntrySide, LedgerError, LedgerResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

// ============================================================================
// GENERAL JOURNAL
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeneralJournal<'c> {
    chart: &'c ChartOfAccounts,
    entries: Vec<Transaction>,
}

impl<'c> GeneralJournal<'c> {
    pub fn new(chart: &'c ChartOfAccounts) -> Self {
        GeneralJournal {
            chart,
            entries: Vec::new(),
        }
    }

    pub fn chart(&self) -> &'c ChartOfAccounts {
        self.chart
    }

    /// Record a transaction after checking both accounts exist in the chart.
    ///
    /// Amounts are not validated here.
    pub fn record_entry(&mut self, txn: Transaction) -> LedgerResult<()> {
        self.ensure_known(&txn.debit, EntrySide::Debit)?;
        self.ensure_known(&txn.credit, EntrySide::Credit)?;

        debug!(
            debit = txn.debit.code(),
            credit = txn.credit.code(),
            amount = txn.amount,
            "journal entry recorded"
        );
        self.entries.push(txn);
        Ok(())
    }

    /// The account must be the chart's own account of that name, not just a
    /// namesake from another chart.
    fn ensure_known(&self, account: &Account, side: EntrySide) -> LedgerResult<()> {
        let known = self.chart.get_account(account.name()).ok();
        if known == Some(account) {
            Ok(())
        } else {
            Err(LedgerError::UnknownAccount {
                side,
                identifier: account.name().to_string(),
            })
        }
    }

    /// Resolve a `{debit_code, credit_code, amount}` record against the chart
    /// and record it.
    pub fn record_from(&mut self, record: &TransactionRecord) -> LedgerResult<()> {
        let debit = self.resolve(&record.debit_code, EntrySide::Debit)?;
        let credit = self.resolve(&record.credit_code, EntrySide::Credit)?;
        self.record_entry(Transaction::new(debit, credit, record.amount))
    }

    fn resolve(&self, identifier: &str, side: EntrySide) -> LedgerResult<&'c Account> {
        self.chart
            .get_account(identifier)
            .map_err(|_| LedgerError::UnknownAccount {
                side,
                identifier: identifier.to_string(),
            })
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    pub fn to_records(&self) -> Vec<TransactionRecord> {
        self.entries.iter().map(Transaction::to_record).collect()
    }

    /// Replace every in-memory entry with `records`, re-validating each one.
    ///
    /// On failure the journal is left empty rather than half-loaded.
    pub fn replace_with(&mut self, records: &[TransactionRecord]) -> LedgerResult<()> {
        self.entries.clear();
        for record in records {
            if let Err(err) = self.record_from(record) {
                self.entries.clear();
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> LedgerResult<()> {
        serde_json::to_writer_pretty(writer, &self.to_records())?;
        Ok(())
    }

    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> LedgerResult<()> {
        let records: Vec<TransactionRecord> = serde_json::from_reader(reader)?;
        self.replace_with(&records)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> LedgerResult<()> {
        let file = File::create(path.as_ref())?;
        self.to_writer(BufWriter::new(file))?;
        info!(path = ?path.as_ref(), entries = self.len(), "journal saved");
        Ok(())
    }

    /// Load entries from a JSON file. The bound chart must already be loaded.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> LedgerResult<()> {
        let file = File::open(path.as_ref())?;
        self.load_from_reader(BufReader::new(file))?;
        info!(path = ?path.as_ref(), entries = self.len(), "journal loaded");
        Ok(())
    }
}

// ============================================================================
// SALES JOURNAL
// ============================================================================

/// Records credit sales: debit receivables, credit sales revenue.
pub struct SalesJournal<'j, 'c> {
    journal: &'j mut GeneralJournal<'c>,
    receivable: Account,
    revenue: Account,
}

impl<'j, 'c> SalesJournal<'j, 'c> {
    pub fn new(
        journal: &'j mut GeneralJournal<'c>,
        receivable: &Account,
        revenue: &Account,
    ) -> LedgerResult<Self> {
        if receivable.account_type() != AccountType::Asset {
            return Err(LedgerError::InvalidSalesAccount {
                account: receivable.name().to_string(),
                expected: AccountType::Asset.as_str(),
            });
        }
        if revenue.account_type() != AccountType::Revenue {
            return Err(LedgerError::InvalidSalesAccount {
                account: revenue.name().to_string(),
                expected: AccountType::Revenue.as_str(),
            });
        }

        Ok(SalesJournal {
            journal,
            receivable: receivable.clone(),
            revenue: revenue.clone(),
        })
    }

    pub fn record_sale(&mut self, amount: f64) -> LedgerResult<()> {
        if amount.is_nan() || amount <= 0.0 {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        self.journal
            .record_entry(Transaction::new(&self.receivable, &self.revenue, amount))
    }
}

// ============================================================================
// TESTS
// ============================================================================
