// 📊 Financial Reporter - trial balance, income statement, balance sheet, ratios
//
// Works on an engine whose balances are already computed. Hierarchy totals
// are rolled up recursively from each top-level account. Net income is
// computed once per reporter and reused by the balance sheet and ratios.
//
// Everything returned here is structured data; rendering is the caller's job.

use crate::chart::ChartOfAccounts;
use crate::engine::ComputationalEngine;
use crate::entities::{Account, AccountType};
use crate::error::LedgerResult;
use serde::Serialize;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// One trial balance row. Exactly one of `debit` / `credit` is non-zero,
/// unless the account itself has a zero balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeStatementLine {
    /// Top-level account name
    pub category: String,

    /// Revenue as a positive figure, expenses as a negative one
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeStatement {
    pub lines: Vec<IncomeStatementLine>,
    pub total_revenue: f64,
    pub total_expense: f64,
    pub net_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheet {
    pub assets: f64,
    pub liabilities: f64,

    /// Equity accounts plus the current period's net income
    pub equity: f64,

    /// Assets ≈ Liabilities + Equity
    pub balanced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRatios {
    /// Assets / Liabilities
    pub current_ratio: f64,

    /// Liabilities / Equity
    pub debt_to_equity_ratio: f64,
}

// ============================================================================
// REPORTER
// ============================================================================

pub struct FinancialReporter<'a> {
    engine: &'a ComputationalEngine<'a>,
    chart: &'a ChartOfAccounts,

    /// Set by the first income statement, then reused
    net_income: Option<f64>,
}

impl<'a> FinancialReporter<'a> {
    pub fn new(engine: &'a ComputationalEngine<'a>, chart: &'a ChartOfAccounts) -> Self {
        FinancialReporter {
            engine,
            chart,
            net_income: None,
        }
    }

    /// Net income, if an income statement has been generated.
    pub fn net_income(&self) -> Option<f64> {
        self.net_income
    }

    /// An account's own balance plus the balances of all its descendants.
    pub fn rolled_up_balance(&self, identifier: &str) -> LedgerResult<f64> {
        let account = self.chart.get_account(identifier)?;
        Ok(self.rollup(account))
    }

    fn rollup(&self, account: &Account) -> f64 {
        let own = self.engine.get_balance(account.name());
        let children: f64 = self
            .chart
            .get_children(account.code())
            .map(|children| children.into_iter().map(|child| self.rollup(child)).sum::<f64>())
            .unwrap_or(0.0);
        own + children
    }

    /// Every account in code order, split into debit / credit columns.
    ///
    /// Leaf accounts with a zero balance are left out; parents are always
    /// listed (with their own balance, not the rollup).
    pub fn generate_trial_balance(&self) -> Vec<TrialBalanceRow> {
        self.chart
            .iter()
            .filter_map(|account| {
                let balance = self.engine.get_balance(account.name());
                if balance == 0.0 && !self.chart.has_children(account.code()) {
                    return None;
                }

                Some(TrialBalanceRow {
                    code: account.code().to_string(),
                    name: account.name().to_string(),
                    debit: if balance > 0.0 { balance } else { 0.0 },
                    credit: if balance < 0.0 { balance.abs() } else { 0.0 },
                })
            })
            .collect()
    }

    /// Revenue and expense totals from top-level accounts, rolled up.
    pub fn generate_income_statement(&mut self) -> IncomeStatement {
        let mut lines = Vec::new();
        let mut total_revenue = 0.0;
        let mut total_expense = 0.0;

        for account in self.chart.root_accounts() {
            match account.account_type() {
                AccountType::Revenue => {
                    let amount = self.rollup(account).abs();
                    total_revenue += amount;
                    lines.push(IncomeStatementLine {
                        category: account.name().to_string(),
                        amount,
                    });
                }
                AccountType::Expense => {
                    let amount = self.rollup(account);
                    total_expense += amount;
                    lines.push(IncomeStatementLine {
                        category: account.name().to_string(),
                        amount: -amount,
                    });
                }
                _ => {}
            }
        }

        let net_income = total_revenue - total_expense;
        self.net_income = Some(net_income);

        IncomeStatement {
            lines,
            total_revenue,
            total_expense,
            net_income,
        }
    }

    fn ensure_net_income(&mut self) -> f64 {
        match self.net_income {
            Some(net_income) => net_income,
            None => self.generate_income_statement().net_income,
        }
    }

    /// Asset, liability and equity totals from top-level accounts.
    ///
    /// Net income is folded into equity, so the sheet balances before the
    /// period has been closed.
    pub fn generate_balance_sheet(&mut self) -> BalanceSheet {
        let net_income = self.ensure_net_income();

        let mut assets = 0.0;
        let mut liabilities = 0.0;
        let mut equity = 0.0;

        for account in self.chart.root_accounts() {
            match account.account_type() {
                AccountType::Asset => assets += self.rollup(account),
                AccountType::Liability => liabilities += self.rollup(account).abs(),
                AccountType::Equity => equity += self.rollup(account).abs(),
                _ => {}
            }
        }
        equity += net_income;

        BalanceSheet {
            assets,
            liabilities,
            equity,
            balanced: approx_eq(assets, liabilities + equity),
        }
    }

    pub fn generate_financial_ratios(&mut self) -> FinancialRatios {
        self.ensure_net_income();
        let sheet = self.generate_balance_sheet();

        FinancialRatios {
            current_ratio: safe_ratio(sheet.assets, sheet.liabilities),
            debt_to_equity_ratio: safe_ratio(sheet.liabilities, sheet.equity),
        }
    }
}

/// `numerator / denominator`, or +∞ / 0 when the denominator is not positive.
fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else if numerator > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Relative tolerance 1e-9, with an absolute floor of 1e-9 for values near zero.
fn approx_eq(a: f64, b: f64) -> bool {
    const REL_TOL: f64 = 1e-9;
    const ABS_TOL: f64 = 1e-9;
    (a - b).abs() <= (REL_TOL * a.abs().max(b.abs())).max(ABS_TOL)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Transaction;
    use crate::journal::GeneralJournal;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn record(journal: &mut GeneralJournal<'_>, debit: &str, credit: &str, amount: f64) {
        let chart = journal.chart();
        journal
            .record_entry(Transaction::new(
                chart.get_account(debit).unwrap(),
                chart.get_account(credit).unwrap(),
                amount,
            ))
            .unwrap();
    }

    fn scenario_chart() -> ChartOfAccounts {
        let mut chart = ChartOfAccounts::new();
        chart.add_account("1010", "Cash", AccountType::Asset, None).unwrap();
        chart.add_account("3010", "Retained Earnings", AccountType::Equity, None).unwrap();
        chart.add_account("4000", "Sales", AccountType::Revenue, None).unwrap();
        chart.add_account("5000", "Expense", AccountType::Expense, None).unwrap();
        chart
    }

    /// Parents with children for every type, to exercise rollups.
    fn hierarchical_chart() -> ChartOfAccounts {
        let mut chart = ChartOfAccounts::new();
        chart.add_account("1000", "Assets", AccountType::Asset, None).unwrap();
        chart.add_account("1010", "Cash", AccountType::Asset, Some("1000")).unwrap();
        chart.add_account("1100", "Receivables", AccountType::Asset, Some("1000")).unwrap();
        chart.add_account("1110", "Trade Receivables", AccountType::Asset, Some("1100")).unwrap();
        chart.add_account("2000", "Liabilities", AccountType::Liability, None).unwrap();
        chart.add_account("2010", "Bank Loan", AccountType::Liability, Some("2000")).unwrap();
        chart.add_account("3000", "Equity", AccountType::Equity, None).unwrap();
        chart.add_account("3010", "Owner Capital", AccountType::Equity, Some("3000")).unwrap();
        chart.add_account("4000", "Income", AccountType::Revenue, None).unwrap();
        chart.add_account("4010", "Product Sales", AccountType::Revenue, Some("4000")).unwrap();
        chart.add_account("4020", "Service Fees", AccountType::Revenue, Some("4000")).unwrap();
        chart.add_account("5000", "Costs", AccountType::Expense, None).unwrap();
        chart.add_account("5010", "Rent", AccountType::Expense, Some("5000")).unwrap();
        chart.add_account("5020", "Wages", AccountType::Expense, Some("5000")).unwrap();
        chart
    }

    fn hierarchical_journal(chart: &ChartOfAccounts) -> GeneralJournal<'_> {
        let mut journal = GeneralJournal::new(chart);
        record(&mut journal, "Cash", "Owner Capital", 5000.0);
        record(&mut journal, "Cash", "Bank Loan", 2000.0);
        record(&mut journal, "Trade Receivables", "Product Sales", 1500.0);
        record(&mut journal, "Cash", "Service Fees", 500.0);
        record(&mut journal, "Rent", "Cash", 800.0);
        record(&mut journal, "Wages", "Cash", 700.0);
        journal
    }

    #[test]
    fn test_scenario_income_statement() {
        let chart = scenario_chart();
        let mut journal = GeneralJournal::new(&chart);
        record(&mut journal, "Cash", "Sales", 1000.0);
        record(&mut journal, "Expense", "Cash", 500.0);

        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, &chart);

        assert_eq!(reporter.net_income(), None);
        let statement = reporter.generate_income_statement();

        assert_eq!(statement.net_income, 500.0);
        assert_eq!(statement.total_revenue, 1000.0);
        assert_eq!(statement.total_expense, 500.0);
        assert_eq!(
            statement.lines,
            vec![
                IncomeStatementLine { category: "Sales".to_string(), amount: 1000.0 },
                IncomeStatementLine { category: "Expense".to_string(), amount: -500.0 },
            ]
        );
        assert_eq!(reporter.net_income(), Some(500.0));
    }

    #[test]
    fn test_trial_balance_rows() {
        let chart = hierarchical_chart();
        let journal = hierarchical_journal(&chart);
        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let reporter = FinancialReporter::new(&engine, &chart);

        let rows = reporter.generate_trial_balance();
        let codes: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();

        // Parents listed even at zero; empty leaves skipped (none here)
        assert_eq!(
            codes,
            vec![
                "1000", "1010", "1100", "1110", "2000", "2010", "3000", "3010", "4000", "4010",
                "4020", "5000", "5010", "5020"
            ]
        );

        let cash = rows.iter().find(|r| r.name == "Cash").unwrap();
        assert_eq!((cash.debit, cash.credit), (6000.0, 0.0));

        let loan = rows.iter().find(|r| r.name == "Bank Loan").unwrap();
        assert_eq!((loan.debit, loan.credit), (0.0, 2000.0));

        let parent = rows.iter().find(|r| r.code == "1000").unwrap();
        assert_eq!((parent.debit, parent.credit), (0.0, 0.0));

        let debits: f64 = rows.iter().map(|r| r.debit).sum();
        let credits: f64 = rows.iter().map(|r| r.credit).sum();
        assert_close(debits, credits);
    }

    #[test]
    fn test_trial_balance_skips_empty_leaves() {
        let chart = scenario_chart();
        let mut journal = GeneralJournal::new(&chart);
        record(&mut journal, "Cash", "Sales", 100.0);

        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let reporter = FinancialReporter::new(&engine, &chart);

        let names: Vec<String> = reporter
            .generate_trial_balance()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Cash".to_string(), "Sales".to_string()]);
    }

    #[test]
    fn test_rollup_through_hierarchy() {
        let chart = hierarchical_chart();
        let journal = hierarchical_journal(&chart);
        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let reporter = FinancialReporter::new(&engine, &chart);

        // Cash 6000 + Trade Receivables 1500
        assert_close(reporter.rolled_up_balance("Assets").unwrap(), 7500.0);
        assert_close(reporter.rolled_up_balance("1100").unwrap(), 1500.0);
        assert_close(reporter.rolled_up_balance("Income").unwrap(), -2000.0);
        assert!(reporter.rolled_up_balance("nope").is_err());
    }

    #[test]
    fn test_hierarchical_statements_balance() {
        let chart = hierarchical_chart();
        let journal = hierarchical_journal(&chart);
        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, &chart);

        let statement = reporter.generate_income_statement();
        assert_close(statement.total_revenue, 2000.0);
        assert_close(statement.total_expense, 1500.0);
        assert_close(statement.net_income, 500.0);
        assert_eq!(statement.lines.len(), 2);

        let sheet = reporter.generate_balance_sheet();
        assert_close(sheet.assets, 7500.0);
        assert_close(sheet.liabilities, 2000.0);
        assert_close(sheet.equity, 5500.0);
        assert!(sheet.balanced);
    }

    #[test]
    fn test_balance_sheet_computes_net_income_first() {
        let chart = scenario_chart();
        let mut journal = GeneralJournal::new(&chart);
        record(&mut journal, "Cash", "Sales", 1000.0);
        record(&mut journal, "Expense", "Cash", 500.0);

        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, &chart);

        let sheet = reporter.generate_balance_sheet();
        assert_eq!(reporter.net_income(), Some(500.0));
        assert_eq!(sheet.assets, 500.0);
        assert_eq!(sheet.equity, 500.0);
        assert!(sheet.balanced);
    }

    #[test]
    fn test_balance_sheet_detects_one_sided_adjustment() {
        let chart = scenario_chart();
        let mut journal = GeneralJournal::new(&chart);
        record(&mut journal, "Cash", "Retained Earnings", 1000.0);
        // Manual entry posted on the wrong side of revenue
        record(&mut journal, "Sales", "Cash", 300.0);

        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, &chart);

        // Revenue is reported as |+300|, so net income rises while assets fall
        let sheet = reporter.generate_balance_sheet();
        assert_close(sheet.assets, 700.0);
        assert_close(sheet.equity, 1300.0);
        assert!(!sheet.balanced);
    }

    #[test]
    fn test_financial_ratios() {
        let chart = hierarchical_chart();
        let journal = hierarchical_journal(&chart);
        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, &chart);

        let ratios = reporter.generate_financial_ratios();
        assert_close(ratios.current_ratio, 7500.0 / 2000.0);
        assert_close(ratios.debt_to_equity_ratio, 2000.0 / 5500.0);
        assert!(reporter.net_income().is_some());
    }

    #[test]
    fn test_ratios_with_zero_denominators() {
        let chart = scenario_chart();
        let mut journal = GeneralJournal::new(&chart);
        record(&mut journal, "Cash", "Sales", 100.0);

        let mut engine = ComputationalEngine::new(&journal);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, &chart);

        let ratios = reporter.generate_financial_ratios();
        assert_eq!(ratios.current_ratio, f64::INFINITY);
        assert_close(ratios.debt_to_equity_ratio, 0.0);

        let empty = GeneralJournal::new(&chart);
        let mut engine = ComputationalEngine::new(&empty);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, &chart);
        let ratios = reporter.generate_financial_ratios();
        assert_eq!(ratios.current_ratio, 0.0);
        assert_eq!(ratios.debt_to_equity_ratio, 0.0);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(approx_eq(1e12, 1e12 + 1.0));
        assert!(!approx_eq(100.0, 100.01));
        assert!(approx_eq(0.0, 1e-12));
    }
}
