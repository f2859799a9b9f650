use crate::core::config::Config;
use crate::core::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// A single CVE row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CveRecord {
    /// CVE identifier, e.g. "CVE-2023-1234"
    pub id: String,
    pub description: String,
    pub severity: String,
    /// Free text date as given by the feed
    pub published: String,
    pub exploit_available: bool,
}

impl CveRecord {
    /// Create a new CVE record
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        severity: impl Into<String>,
        published: impl Into<String>,
        exploit_available: bool,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            severity: severity.into(),
            published: published.into(),
            exploit_available,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            description: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            severity: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            published: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            exploit_available: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
        })
    }
}

/// SQLite-backed CVE table
pub struct CveStore {
    conn: Connection,
}

impl CveStore {
    /// Open or create the CVE database in the configured data directory
    pub fn open(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.base_dir).map_err(|e| {
            Error::StorageInit(format!(
                "Failed to create data directory {}: {}",
                config.base_dir.display(),
                e
            ))
        })?;

        let conn = Connection::open(&config.database_path).map_err(|e| {
            Error::StorageInit(format!(
                "Failed to open CVE database {}: {}",
                config.database_path.display(),
                e
            ))
        })?;

        let store = Self { conn };
        store
            .ensure_schema()
            .map_err(|e| Error::StorageInit(e.to_string()))?;

        tracing::info!(path = %config.database_path.display(), "opened CVE database");
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            Error::StorageInit(format!("Failed to create in-memory database: {}", e))
        })?;

        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the CVE table if it doesn't exist
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS cves (
                    id TEXT PRIMARY KEY,
                    description TEXT,
                    severity TEXT,
                    published TEXT,
                    exploit_available BOOLEAN
                );
                "#,
            )
            .map_err(|e| Error::Database(format!("Failed to create CVE table: {}", e)))
    }

    /// Insert or replace every record in a single transaction.
    ///
    /// Returns the number of records written. On failure nothing is committed.
    pub fn upsert_many(&mut self, records: &[CveRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| Error::Persistence(format!("Failed to begin transaction: {}", e)))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO cves (id, description, severity, published, exploit_available)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(|e| Error::Persistence(format!("Failed to prepare upsert: {}", e)))?;

            for record in records {
                stmt.execute(params![
                    record.id,
                    record.description,
                    record.severity,
                    record.published,
                    record.exploit_available,
                ])
                .map_err(|e| {
                    Error::Persistence(format!("Failed to write {}: {}", record.id, e))
                })?;
            }
        }

        // Dropping an uncommitted transaction rolls it back.
        tx.commit()
            .map_err(|e| Error::Persistence(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(count = records.len(), "upserted CVE batch");
        Ok(records.len())
    }

    /// Return every record whose id or description contains `substring`.
    ///
    /// Matching is case-sensitive and literal; an empty substring matches all rows.
    pub fn search(&self, substring: &str) -> Result<Vec<CveRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, description, severity, published, exploit_available
                 FROM cves
                 WHERE instr(id, ?1) > 0 OR instr(COALESCE(description, ''), ?1) > 0
                 ORDER BY rowid",
            )
            .map_err(|e| Error::Database(format!("Failed to prepare search: {}", e)))?;

        let records = stmt
            .query_map([substring], CveRecord::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::Database(format!("Search failed: {}", e)))?;

        tracing::debug!(query = substring, hits = records.len(), "searched CVEs");
        Ok(records)
    }

    /// Look up a single record by id
    pub fn get(&self, id: &str) -> Result<Option<CveRecord>> {
        self.conn
            .query_row(
                "SELECT id, description, severity, published, exploit_available
                 FROM cves WHERE id = ?1",
                [id],
                CveRecord::from_row,
            )
            .optional()
            .map_err(|e| Error::Database(format!("Failed to get {}: {}", id, e)))
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM cves", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(|e| Error::Database(format!("Failed to count CVEs: {}", e)))
    }
}
