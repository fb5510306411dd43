// 🗂️ Chart of Accounts - the registry every other engine validates against
//
// Storage is an arena keyed by code (BTreeMap, so iteration is always in
// ascending code order) plus two indexes: name → code and
// parent code → child codes. Parents must exist before their children,
// which keeps the hierarchy a forest without any cycle checks.

use crate::entities::{Account, AccountRecord, AccountType};
use crate::error::{LedgerError, LedgerResult};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    /// Primary storage, ordered by code
    accounts: BTreeMap<String, Account>,

    /// Secondary key: name → code
    by_name: HashMap<String, String>,

    /// Hierarchy index: parent code → child codes (ordered)
    children: HashMap<String, BTreeSet<String>>,
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default chart written when a workspace is initialised.
    pub fn standard() -> Self {
        let mut chart = ChartOfAccounts::new();
        let defaults = [
            ("1000", "Cash", AccountType::Asset),
            ("1100", "Accounts Receivable", AccountType::Asset),
            ("2000", "Accounts Payable", AccountType::Liability),
            ("3000", "Retained Earnings", AccountType::Equity),
            ("4000", "Revenue", AccountType::Revenue),
            ("5000", "Expenses", AccountType::Expense),
        ];
        for (code, name, account_type) in defaults {
            chart.insert(Account::new(
                code.to_string(),
                name.to_string(),
                account_type,
                None,
            ));
        }
        chart
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Add a new account, optionally under an existing parent.
    ///
    /// Fails with `DuplicateCode`, `DuplicateName` or `UnknownParent`.
    /// An empty `parent_code` is treated as no parent.
    pub fn add_account(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent_code: Option<&str>,
    ) -> LedgerResult<Account> {
        let code = code.into();
        let name = name.into();

        if self.accounts.contains_key(&code) {
            return Err(LedgerError::DuplicateCode(code));
        }
        if self.by_name.contains_key(&name) {
            return Err(LedgerError::DuplicateName(name));
        }

        let parent_code = parent_code.filter(|p| !p.is_empty());
        if let Some(parent) = parent_code {
            if !self.accounts.contains_key(parent) {
                return Err(LedgerError::UnknownParent(parent.to_string()));
            }
        }

        let account = Account::new(code, name, account_type, parent_code.map(str::to_string));
        debug!(account = %account, parent = ?account.parent_code(), "account added");
        self.insert(account.clone());
        Ok(account)
    }

    fn insert(&mut self, account: Account) {
        if let Some(parent) = account.parent_code() {
            self.children
                .entry(parent.to_string())
                .or_default()
                .insert(account.code().to_string());
        }
        self.by_name
            .insert(account.name().to_string(), account.code().to_string());
        self.accounts.insert(account.code().to_string(), account);
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Resolve an account by code first, then by exact name.
    pub fn get_account(&self, identifier: &str) -> LedgerResult<&Account> {
        self.find(identifier)
            .ok_or_else(|| LedgerError::AccountNotFound(identifier.to_string()))
    }

    fn find(&self, identifier: &str) -> Option<&Account> {
        self.accounts.get(identifier).or_else(|| {
            self.by_name
                .get(identifier)
                .and_then(|code| self.accounts.get(code))
        })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.find(identifier).is_some()
    }

    /// Direct children of an account, in code order.
    pub fn get_children(&self, parent_identifier: &str) -> LedgerResult<Vec<&Account>> {
        let parent = self.get_account(parent_identifier)?;
        Ok(self.children_of(parent.code()).collect())
    }

    fn children_of<'a>(&'a self, code: &str) -> impl Iterator<Item = &'a Account> + 'a {
        self.children
            .get(code)
            .into_iter()
            .flatten()
            .filter_map(|child| self.accounts.get(child))
    }

    pub fn has_children(&self, code: &str) -> bool {
        self.children.get(code).is_some_and(|c| !c.is_empty())
    }

    /// Every account below `identifier`, depth-first, siblings in code order.
    pub fn descendants(&self, identifier: &str) -> LedgerResult<Vec<&Account>> {
        let root = self.get_account(identifier)?;
        let mut out = Vec::new();
        self.collect_descendants(root.code(), &mut out);
        Ok(out)
    }

    fn collect_descendants<'a>(&'a self, code: &str, out: &mut Vec<&'a Account>) {
        for child in self.children_of(code) {
            out.push(child);
            self.collect_descendants(child.code(), out);
        }
    }

    /// Parentless accounts, in code order.
    pub fn root_accounts(&self) -> impl Iterator<Item = &Account> {
        self.iter().filter(|acc| acc.is_root())
    }

    /// All accounts in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    pub fn to_records(&self) -> Vec<AccountRecord> {
        self.iter().map(Account::to_record).collect()
    }

    /// Rebuild a chart from persisted records, in any input order.
    ///
    /// Records are sorted by code and then added in passes, so a child whose
    /// code sorts before its parent's still loads. A record whose parent never
    /// appears fails with `UnknownParent`; records that only reach each other
    /// through their parents fail with `CyclicParent`.
    pub fn from_records(mut records: Vec<AccountRecord>) -> LedgerResult<Self> {
        records.sort_by(|a, b| a.code.cmp(&b.code));

        let mut chart = ChartOfAccounts::new();
        let mut pending = records;

        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();

            for record in pending {
                let ready = match record.parent_code.as_deref() {
                    Some(parent) if !parent.is_empty() => chart.accounts.contains_key(parent),
                    _ => true,
                };
                if ready {
                    chart.add_account(
                        record.code,
                        record.name,
                        record.account_type,
                        record.parent_code.as_deref(),
                    )?;
                } else {
                    deferred.push(record);
                }
            }

            if deferred.len() == before {
                return Err(stalled_load_error(&deferred));
            }
            pending = deferred;
        }

        Ok(chart)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> LedgerResult<()> {
        serde_json::to_writer_pretty(writer, &self.to_records())?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> LedgerResult<Self> {
        let records: Vec<AccountRecord> = serde_json::from_reader(reader)?;
        Self::from_records(records)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> LedgerResult<()> {
        let file = File::create(path.as_ref())?;
        self.to_writer(BufWriter::new(file))?;
        info!(path = ?path.as_ref(), accounts = self.len(), "chart of accounts saved");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let file = File::open(path.as_ref())?;
        let chart = Self::from_reader(BufReader::new(file))?;
        info!(path = ?path.as_ref(), accounts = chart.len(), "chart of accounts loaded");
        Ok(chart)
    }
}

/// Explain why no deferred record could be added. A parent outside the
/// deferred set is missing outright; otherwise every record waits on another
/// deferred record, which can only happen through a cycle.
fn stalled_load_error(deferred: &[AccountRecord]) -> LedgerError {
    let waiting: HashSet<&str> = deferred.iter().map(|r| r.code.as_str()).collect();

    for record in deferred {
        if let Some(parent) = record.parent_code.as_deref() {
            if !waiting.contains(parent) {
                return LedgerError::UnknownParent(parent.to_string());
            }
        }
    }

    let code = deferred.first().map(|r| r.code.clone()).unwrap_or_default();
    LedgerError::CyclicParent(code)
}

impl<'a> IntoIterator for &'a ChartOfAccounts {
    type Item = &'a Account;
    type IntoIter = std::collections::btree_map::Values<'a, String, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.values()
    }
}

// ============================================================================
// TESTS
// ============================================================================
