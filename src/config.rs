// ⚙️ Configuration - where a workspace lives and how it is stored
//
// Loaded from an optional JSON file; every field has a default so an
// empty `{}` (or no file at all) is a valid configuration.

use crate::error::LedgerResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// chart_of_accounts.json + journal.json
    Json,

    /// Single SQLite database file
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the workspace files
    pub workspace_dir: PathBuf,

    pub storage: StorageBackend,

    /// Equity account (code or name) that absorbs net income on closing
    pub retained_earnings_code: String,

    pub chart_file: String,
    pub journal_file: String,
    pub database_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workspace_dir: PathBuf::from("reports"),
            storage: StorageBackend::Json,
            retained_earnings_code: "3000".to_string(),
            chart_file: "chart_of_accounts.json".to_string(),
            journal_file: "journal.json".to_string(),
            database_file: "ledger.db".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_workspace_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.workspace_dir = dir.into();
        self
    }

    pub fn chart_path(&self) -> PathBuf {
        self.workspace_dir.join(&self.chart_file)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.workspace_dir.join(&self.journal_file)
    }

    pub fn database_path(&self) -> PathBuf {
        self.workspace_dir.join(&self.database_file)
    }
}
