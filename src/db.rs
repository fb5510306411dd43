// 🗄️ SQLite Storage - alternate persistence for chart and journal
//
// Same data as the JSON files, two tables:
// - accounts: one row per account
// - journal_entries: one row per transaction, keyed by position so the
//   journal order survives a round trip
//
// Saves replace everything inside one SQL transaction. Loads go through
// the same validation path as the JSON loaders.

use crate::chart::ChartOfAccounts;
use crate::entities::{AccountRecord, AccountType, TransactionRecord};
use crate::error::LedgerResult;
use crate::journal::GeneralJournal;
use rusqlite::{params, Connection};
use tracing::info;

pub fn setup_database(conn: &Connection) -> LedgerResult<()> {
    // WAL for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            code TEXT PRIMARY KEY,
            name TEXT UNIQUE NOT NULL,
            account_type TEXT NOT NULL,
            parent_code TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS journal_entries (
            position INTEGER PRIMARY KEY,
            debit_code TEXT NOT NULL,
            credit_code TEXT NOT NULL,
            amount REAL NOT NULL
        )",
        [],
    )?;

    Ok(())
}

// ============================================================================
// CHART
// ============================================================================

pub fn save_chart(conn: &Connection, chart: &ChartOfAccounts) -> LedgerResult<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM accounts", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO accounts (code, name, account_type, parent_code) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for account in chart.iter() {
            stmt.execute(params![
                account.code(),
                account.name(),
                account.account_type().as_str(),
                account.parent_code(),
            ])?;
        }
    }
    tx.commit()?;

    info!(accounts = chart.len(), "chart saved to database");
    Ok(chart.len())
}

pub fn load_chart(conn: &Connection) -> LedgerResult<ChartOfAccounts> {
    let mut stmt =
        conn.prepare("SELECT code, name, account_type, parent_code FROM accounts ORDER BY code")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(rows.len());
    for (code, name, account_type, parent_code) in rows {
        records.push(AccountRecord {
            code,
            name,
            account_type: account_type.parse::<AccountType>()?,
            parent_code,
        });
    }

    ChartOfAccounts::from_records(records)
}

// ============================================================================
// JOURNAL
// ============================================================================

pub fn save_journal(conn: &Connection, journal: &GeneralJournal<'_>) -> LedgerResult<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM journal_entries", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO journal_entries (position, debit_code, credit_code, amount)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (position, record) in journal.to_records().iter().enumerate() {
            stmt.execute(params![
                position as i64,
                record.debit_code,
                record.credit_code,
                record.amount,
            ])?;
        }
    }
    tx.commit()?;

    info!(entries = journal.len(), "journal saved to database");
    Ok(journal.len())
}

/// Replace `journal`'s entries with the stored ones, re-validating each.
pub fn load_journal(conn: &Connection, journal: &mut GeneralJournal<'_>) -> LedgerResult<()> {
    let mut stmt = conn.prepare(
        "SELECT debit_code, credit_code, amount FROM journal_entries ORDER BY position",
    )?;

    let records = stmt
        .query_map([], |row| {
            Ok(TransactionRecord {
                debit_code: row.get(0)?,
                credit_code: row.get(1)?,
                amount: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    journal.replace_with(&records)
}

pub fn count_accounts(conn: &Connection) -> LedgerResult<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
    Ok(count)
}

pub fn count_entries(conn: &Connection) -> LedgerResult<i64> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM journal_entries", [], |row| row.get(0))?;
    Ok(count)
}

// ============================================================================
// TESTS
// ============================================================================
