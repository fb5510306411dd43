use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use symbolic_ledger::{
    post_transactions_from_csv, ChartOfAccounts, ComputationalEngine, Config, FinancialReporter,
    PeriodEndCloser, Workspace,
};

#[derive(Parser, Debug)]
#[command(name = "symbolic-ledger")]
#[command(about = "Double-entry bookkeeping over a chart of accounts and a journal")]
struct Args {
    /// Workspace directory (overrides the config file)
    #[arg(long, env = "LEDGER_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Optional JSON config file
    #[arg(long, default_value = "ledger.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the standard chart of accounts and an empty journal
    Init,

    /// Post transactions from a CSV file (debit_code, credit_code, amount)
    Post { csv: PathBuf },

    /// Show one account's balance
    Balance { account: String },

    /// Print trial balance, income statement, balance sheet and ratios
    Report,

    /// Close revenue and expense accounts into retained earnings
    Close {
        /// Equity account to close into (defaults to the configured one)
        #[arg(long)]
        into: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to read config file: {:?}", args.config))?;
    if let Some(dir) = args.workspace {
        config = config.with_workspace_dir(dir);
    }

    let workspace = Workspace::open(config).context("Failed to open workspace")?;

    match args.command {
        Command::Init => run_init(&workspace),
        Command::Post { csv } => run_post(&workspace, csv),
        Command::Balance { account } => run_balance(&workspace, &account),
        Command::Report => run_report(&workspace),
        Command::Close { into } => run_close(&workspace, into),
    }
}

fn run_init(workspace: &Workspace) -> Result<()> {
    let chart = ChartOfAccounts::standard();
    workspace.init(&chart).context("Failed to initialize workspace")?;
    println!(
        "✓ Initialized {:?} with {} accounts",
        workspace.config().workspace_dir,
        chart.len()
    );
    Ok(())
}

fn run_post(workspace: &Workspace, csv: PathBuf) -> Result<()> {
    let posted = workspace
        .update(|journal| post_transactions_from_csv(journal, &csv))
        .with_context(|| format!("Failed to post transactions from {:?}", csv))?;
    println!("✓ Posted {} entries", posted);
    Ok(())
}

fn run_balance(workspace: &Workspace, account: &str) -> Result<()> {
    let (code, name, balance) = workspace.read(|chart, journal| {
        let account = chart.get_account(account)?;
        let mut engine = ComputationalEngine::new(journal);
        engine.compute_balances();
        Ok((
            account.code().to_string(),
            account.name().to_string(),
            engine.get_balance(account.name()),
        ))
    })?;
    println!("{} {}: {:.2}", code, name, balance);
    Ok(())
}

fn run_report(workspace: &Workspace) -> Result<()> {
    let rendered = workspace.read(|chart, journal| {
        let mut engine = ComputationalEngine::new(journal);
        engine.compute_balances();
        let mut reporter = FinancialReporter::new(&engine, chart);

        let mut out = Vec::new();

        out.push("# Trial Balance".to_string());
        out.push("| Code | Account | Debit | Credit |".to_string());
        out.push("|---|---|---|---|".to_string());
        for row in reporter.generate_trial_balance() {
            out.push(format!(
                "| {} | {} | {:.2} | {:.2} |",
                row.code, row.name, row.debit, row.credit
            ));
        }
        out.push(format!("\n**Trial balance total:** {:.2}\n", engine.trial_balance()));

        let income = reporter.generate_income_statement();
        out.push("# Income Statement".to_string());
        out.push("| Category | Amount |".to_string());
        out.push("|---|---|".to_string());
        for line in &income.lines {
            out.push(format!("| {} | {:.2} |", line.category, line.amount));
        }
        out.push(format!("\n**Net Income:** {:.2}\n", income.net_income));

        let sheet = reporter.generate_balance_sheet();
        out.push("# Balance Sheet".to_string());
        out.push("| Category | Total |".to_string());
        out.push("|---|---|".to_string());
        out.push(format!("| Assets | {:.2} |", sheet.assets));
        out.push(format!("| Liabilities | {:.2} |", sheet.liabilities));
        out.push(format!("| Equity | {:.2} |", sheet.equity));
        out.push(format!("\n**Balanced:** {}\n", sheet.balanced));

        let ratios = reporter.generate_financial_ratios();
        out.push("# Financial Ratios".to_string());
        out.push(format!("- Current ratio: {:.2}", ratios.current_ratio));
        out.push(format!("- Debt to equity: {:.2}", ratios.debt_to_equity_ratio));

        Ok(out.join("\n"))
    })?;

    println!("{}", rendered);
    Ok(())
}

fn run_close(workspace: &Workspace, into: Option<String>) -> Result<()> {
    let target = into.unwrap_or_else(|| workspace.config().retained_earnings_code.clone());

    let posted = workspace
        .update(|journal| {
            let retained = journal.chart().get_account(&target)?;
            PeriodEndCloser::new(journal, retained)?.run_closing_entries()
        })
        .with_context(|| format!("Failed to close period into '{}'", target))?;

    info!(entries = posted.len(), "closing entries posted");
    for txn in &posted {
        println!(
            "  {} → {}  {:.2}",
            txn.debit.name(),
            txn.credit.name(),
            txn.amount
        );
    }
    println!("✓ Posted {} closing entries", posted.len());
    Ok(())
}
