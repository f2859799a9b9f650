use crate::core::config::Config;
use crate::core::error::{Error, Result};
use redb::{Database, ReadableTable, TableDefinition};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::SystemTime;

/// Table definition for feed import tracking
/// Key: feed file name, value: JSON serialized ImportState
const IMPORTS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("imports");

/// What the ledger remembers about the last import of a feed file
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImportState {
    /// SHA256 hash of the imported feed contents
    pub content_hash: String,
    /// Number of records written by the import
    pub record_count: usize,
    /// Timestamp of the import
    pub imported_at: u64,
}

impl ImportState {
    pub fn new(content_hash: String, record_count: usize) -> Self {
        Self {
            content_hash,
            record_count,
            imported_at: SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::Database(format!("Failed to serialize import state: {}", e)))
    }

    fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Database(format!("Failed to deserialize import state: {}", e)))
    }
}

/// Import status of a feed file relative to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Never imported
    New,
    /// Imported and unchanged since
    Imported,
    /// Imported, but the file contents differ now
    Changed,
}

impl FeedStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FeedStatus::New => "new",
            FeedStatus::Imported => "imported",
            FeedStatus::Changed => "changed",
        }
    }
}

/// Ledger of past feed imports
pub struct ImportLedger {
    db: Database,
}

fn ledger_err<E: std::fmt::Display>(action: &'static str) -> impl Fn(E) -> Error {
    move |e| Error::Database(format!("{}: {}", action, e))
}

impl ImportLedger {
    /// Open the ledger, creating the file and its table on first use
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_at(&config.state_path).map_err(|e| match e {
            Error::Database(msg) => Error::StorageInit(format!("import ledger: {}", msg)),
            other => Error::StorageInit(other.to_string()),
        })
    }

    fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(ledger_err("open"))?;

        let txn = db.begin_write().map_err(ledger_err("begin write"))?;
        txn.open_table(IMPORTS_TABLE).map_err(ledger_err("create table"))?;
        txn.commit().map_err(ledger_err("commit"))?;

        Ok(Self { db })
    }

    /// Last recorded import of `file_name`, if any
    pub fn get(&self, file_name: &str) -> Result<Option<ImportState>> {
        let txn = self.db.begin_read().map_err(ledger_err("begin read"))?;
        let table = txn.open_table(IMPORTS_TABLE).map_err(ledger_err("open table"))?;

        let result = match table.get(file_name).map_err(ledger_err("read entry"))? {
            Some(entry) => ImportState::from_json(entry.value()).map(Some),
            None => Ok(None),
        };
        result
    }

    /// Remember a successful import of `file_name`
    pub fn record_import(
        &self,
        file_name: &str,
        content_hash: String,
        record_count: usize,
    ) -> Result<()> {
        let json = ImportState::new(content_hash, record_count).to_json()?;

        let txn = self.db.begin_write().map_err(ledger_err("begin write"))?;
        txn.open_table(IMPORTS_TABLE)
            .map_err(ledger_err("open table"))?
            .insert(file_name, json.as_str())
            .map_err(ledger_err("write entry"))?;
        txn.commit().map_err(ledger_err("commit"))
    }

    /// Compare a feed's current hash against its last import
    pub fn status(&self, file_name: &str, current_hash: &str) -> Result<FeedStatus> {
        Ok(match self.get(file_name)? {
            None => FeedStatus::New,
            Some(state) if state.content_hash == current_hash => FeedStatus::Imported,
            Some(_) => FeedStatus::Changed,
        })
    }
}

/// Hex SHA-256 of a byte buffer
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hex SHA-256 of a file's contents
pub fn calculate_file_hash(path: &Path) -> Result<String> {
    Ok(hash_bytes(&std::fs::read(path)?))
}
