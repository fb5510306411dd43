// 📁 Workspace - one chart + one journal on disk, one writer at a time
//
// Reports need chart and journal as of the same moment, so a single mutex
// is held across the whole load chart → load journal → compute → report
// sequence. Nothing outside a Workspace call touches its files.

use crate::chart::ChartOfAccounts;
use crate::config::{Config, StorageBackend};
use crate::db;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::GeneralJournal;
use rusqlite::Connection;
use std::fs;
use std::sync::{Mutex, PoisonError};
use tracing::info;

pub struct Workspace {
    config: Config,
    lock: Mutex<()>,
}

impl Workspace {
    /// Open (creating the directory if needed) the workspace described by `config`.
    pub fn open(config: Config) -> LedgerResult<Self> {
        fs::create_dir_all(&config.workspace_dir)?;
        Ok(Workspace {
            config,
            lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Write `chart` and an empty journal, replacing whatever was there.
    pub fn init(&self, chart: &ChartOfAccounts) -> LedgerResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let journal = GeneralJournal::new(chart);
        match self.config.storage {
            StorageBackend::Json => {
                chart.save(self.config.chart_path())?;
                journal.save(self.config.journal_path())?;
            }
            StorageBackend::Sqlite => {
                let conn = self.connect()?;
                db::save_chart(&conn, chart)?;
                db::save_journal(&conn, &journal)?;
            }
        }

        info!(dir = ?self.config.workspace_dir, accounts = chart.len(), "workspace initialized");
        Ok(())
    }

    /// Load a consistent chart + journal snapshot and hand it to `f`.
    pub fn read<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&ChartOfAccounts, &GeneralJournal<'_>) -> LedgerResult<T>,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let chart = self.load_chart()?;
        let mut journal = GeneralJournal::new(&chart);
        self.load_journal(&mut journal)?;
        f(&chart, &journal)
    }

    /// Like [`Workspace::read`], but `f` may append to the journal, which is
    /// persisted if `f` succeeds.
    pub fn update<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut GeneralJournal<'_>) -> LedgerResult<T>,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let chart = self.load_chart()?;
        let mut journal = GeneralJournal::new(&chart);
        self.load_journal(&mut journal)?;

        let before = journal.len();
        let out = f(&mut journal)?;
        self.save_journal(&journal)?;

        info!(added = journal.len().saturating_sub(before), total = journal.len(), "journal updated");
        Ok(out)
    }

    // ========================================================================
    // STORAGE DISPATCH
    // ========================================================================

    fn connect(&self) -> LedgerResult<Connection> {
        let conn = Connection::open(self.config.database_path())?;
        db::setup_database(&conn)?;
        Ok(conn)
    }

    fn load_chart(&self) -> LedgerResult<ChartOfAccounts> {
        match self.config.storage {
            StorageBackend::Json => {
                let path = self.config.chart_path();
                if !path.exists() {
                    return Err(LedgerError::WorkspaceNotInitialized(path.display().to_string()));
                }
                ChartOfAccounts::load(path)
            }
            StorageBackend::Sqlite => {
                let conn = self.connect()?;
                if db::count_accounts(&conn)? == 0 {
                    return Err(LedgerError::WorkspaceNotInitialized(
                        self.config.database_path().display().to_string(),
                    ));
                }
                db::load_chart(&conn)
            }
        }
    }

    fn load_journal(&self, journal: &mut GeneralJournal<'_>) -> LedgerResult<()> {
        match self.config.storage {
            StorageBackend::Json => {
                let path = self.config.journal_path();
                // No journal file yet means no entries yet
                if path.exists() {
                    journal.load(path)?;
                }
                Ok(())
            }
            StorageBackend::Sqlite => db::load_journal(&self.connect()?, journal),
        }
    }

    fn save_journal(&self, journal: &GeneralJournal<'_>) -> LedgerResult<()> {
        match self.config.storage {
            StorageBackend::Json => journal.save(self.config.journal_path()),
            StorageBackend::Sqlite => db::save_journal(&self.connect()?, journal).map(|_| ()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closing::PeriodEndCloser;
    use crate::engine::ComputationalEngine;
    use crate::entities::Transaction;
    use crate::journal::SalesJournal;
    use crate::reports::FinancialReporter;

    fn workspace(dir: &std::path::Path, storage: StorageBackend) -> Workspace {
        let config = Config {
            storage,
            ..Config::default().with_workspace_dir(dir)
        };
        Workspace::open(config).unwrap()
    }

    fn full_cycle(storage: StorageBackend) {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path(), storage);
        ws.init(&ChartOfAccounts::standard()).unwrap();

        // Post a sale, a cash receipt and an expense
        ws.update(|journal| {
            let chart = journal.chart();
            let receivable = chart.get_account("Accounts Receivable")?;
            let revenue = chart.get_account("Revenue")?;
            SalesJournal::new(journal, receivable, revenue)?.record_sale(1200.0)?;

            journal.record_entry(Transaction::new(
                chart.get_account("Cash")?,
                receivable,
                700.0,
            ))?;
            journal.record_entry(Transaction::new(
                chart.get_account("Expenses")?,
                chart.get_account("Cash")?,
                200.0,
            ))
        })
        .unwrap();

        let net_income = ws
            .read(|chart, journal| {
                assert_eq!(journal.len(), 3);
                let mut engine = ComputationalEngine::new(journal);
                engine.compute_balances();
                let mut reporter = FinancialReporter::new(&engine, chart);
                let sheet = reporter.generate_balance_sheet();
                assert!(sheet.balanced);
                Ok(reporter.net_income().unwrap_or_default())
            })
            .unwrap();
        assert_eq!(net_income, 1000.0);

        ws.update(|journal| {
            let retained = journal.chart().get_account("3000")?;
            PeriodEndCloser::new(journal, retained)?.run_closing_entries()
        })
        .unwrap();

        ws.read(|_, journal| {
            assert_eq!(journal.len(), 5);
            let mut engine = ComputationalEngine::new(journal);
            engine.compute_balances();
            assert_eq!(engine.get_balance("Revenue"), 0.0);
            assert_eq!(engine.get_balance("Expenses"), 0.0);
            assert_eq!(engine.get_balance("Retained Earnings"), -1000.0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_full_cycle_json() {
        full_cycle(StorageBackend::Json);
    }

    #[test]
    fn test_full_cycle_sqlite() {
        full_cycle(StorageBackend::Sqlite);
    }

    #[test]
    fn test_read_before_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        for storage in [StorageBackend::Json, StorageBackend::Sqlite] {
            let ws = workspace(dir.path(), storage);
            let err = ws.read(|_, _| Ok(())).unwrap_err();
            assert!(matches!(err, LedgerError::WorkspaceNotInitialized(_)));
        }
    }

    #[test]
    fn test_failed_update_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path(), StorageBackend::Json);
        ws.init(&ChartOfAccounts::standard()).unwrap();

        let result: LedgerResult<()> = ws.update(|journal| {
            let chart = journal.chart();
            journal.record_entry(Transaction::new(
                chart.get_account("Cash")?,
                chart.get_account("Revenue")?,
                50.0,
            ))?;
            chart.get_account("9999").map(|_| ())
        });
        assert!(result.is_err());

        let len = ws.read(|_, journal| Ok(journal.len())).unwrap();
        assert_eq!(len, 0);
    }

    fn concurrent_updates(storage: StorageBackend) {
        const THREADS: usize = 4;
        const POSTS: usize = 10;

        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path(), storage);
        ws.init(&ChartOfAccounts::standard()).unwrap();

        // Every update is load, append, save; an unguarded interleaving would drop entries
        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..POSTS {
                        ws.update(|journal| {
                            let chart = journal.chart();
                            journal.record_entry(Transaction::new(
                                chart.get_account("Cash")?,
                                chart.get_account("Revenue")?,
                                1.0,
                            ))
                        })
                        .unwrap();
                    }
                });
            }
        });

        let (len, cash) = ws
            .read(|_, journal| {
                let mut engine = ComputationalEngine::new(journal);
                engine.compute_balances();
                Ok((journal.len(), engine.get_balance("Cash")))
            })
            .unwrap();
        assert_eq!(len, THREADS * POSTS);
        assert_eq!(cash, (THREADS * POSTS) as f64);
    }

    #[test]
    fn test_concurrent_updates_json() {
        concurrent_updates(StorageBackend::Json);
    }

    #[test]
    fn test_concurrent_updates_sqlite() {
        concurrent_updates(StorageBackend::Sqlite);
    }
}
