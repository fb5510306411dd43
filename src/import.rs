// 📥 CSV Ingestion - delimited rows into journal entries
//
// Expected headers: debit_code, credit_code, amount
// (also accepted: debit / debit_account, credit / credit_account).
// Codes are resolved code-first, then by name. Bad rows are errors,
// never skipped.

use crate::entities::Transaction;
use crate::error::LedgerResult;
use crate::journal::GeneralJournal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsvEntry {
    #[serde(alias = "debit", alias = "debit_account")]
    pub debit_code: String,

    #[serde(alias = "credit", alias = "credit_account")]
    pub credit_code: String,

    pub amount: f64,
}

pub fn load_csv<P: AsRef<Path>>(csv_path: P) -> LedgerResult<Vec<CsvEntry>> {
    let rdr = csv::Reader::from_path(csv_path.as_ref())?;
    collect_entries(rdr)
}

pub fn read_csv<R: Read>(reader: R) -> LedgerResult<Vec<CsvEntry>> {
    collect_entries(csv::Reader::from_reader(reader))
}

fn collect_entries<R: Read>(mut rdr: csv::Reader<R>) -> LedgerResult<Vec<CsvEntry>> {
    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        let mut entry: CsvEntry = result?;
        entry.debit_code = entry.debit_code.trim().to_string();
        entry.credit_code = entry.credit_code.trim().to_string();
        entries.push(entry);
    }
    Ok(entries)
}

/// Resolve and record every entry in order. Stops at the first bad row.
///
/// Returns the number of entries recorded.
pub fn post_entries(journal: &mut GeneralJournal<'_>, entries: &[CsvEntry]) -> LedgerResult<usize> {
    let chart = journal.chart();

    for (row, entry) in entries.iter().enumerate() {
        let resolved = chart
            .get_account(&entry.debit_code)
            .and_then(|debit| Ok((debit, chart.get_account(&entry.credit_code)?)));

        let (debit, credit) = match resolved {
            Ok(pair) => pair,
            Err(err) => {
                warn!(row = row + 1, error = %err, "rejected CSV row");
                return Err(err);
            }
        };

        journal.record_entry(Transaction::new(debit, credit, entry.amount))?;
    }

    Ok(entries.len())
}

/// Load a CSV file and post its rows into `journal`.
pub fn post_transactions_from_csv<P: AsRef<Path>>(
    journal: &mut GeneralJournal<'_>,
    csv_path: P,
) -> LedgerResult<usize> {
    let entries = load_csv(csv_path.as_ref())?;
    let posted = post_entries(journal, &entries)?;
    info!(path = ?csv_path.as_ref(), posted, "CSV transactions posted");
    Ok(posted)
}

// ============================================================================
// TESTS
// ============================================================================
