use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::storage::cves::{CveRecord, CveStore};
use crate::storage::state::hash_bytes;
use serde_json::{Map, Value};
use std::path::PathBuf;

// Defaults for fields missing from a feed entry
const DEFAULT_ID: &str = "UNKNOWN";
const DEFAULT_DESCRIPTION: &str = "No description available.";
const DEFAULT_PUBLISHED: &str = "Unknown";
// The feed carries no severity
const IMPORTED_SEVERITY: &str = "Unknown";

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub file_name: String,
    pub records_written: usize,
    /// SHA256 of the imported document
    pub content_hash: String,
}

/// Decide whether a feed entry is flagged as exploit-available.
///
/// Only a usage value of "unknown" (any case) clears the flag; a missing
/// value counts as the empty string and therefore sets it.
pub fn exploit_available(ransomware_use: Option<&str>) -> bool {
    ransomware_use.unwrap_or("").to_lowercase() != "unknown"
}

/// Parse a feed document into normalized records without touching the store.
///
/// The document must be UTF-8 JSON; anything else is an [`Error::Parse`].
pub fn parse_feed(document: impl AsRef<[u8]>) -> Result<Vec<CveRecord>> {
    let document: Value = serde_json::from_slice(document.as_ref())
        .map_err(|e| Error::Parse(format!("Invalid JSON: {}", e)))?;

    let vulnerabilities = document
        .as_object()
        .and_then(|obj| obj.get("vulnerabilities"))
        .ok_or_else(|| Error::Format("missing vulnerabilities key".to_string()))?;

    let entries = vulnerabilities
        .as_array()
        .ok_or_else(|| Error::Format("vulnerabilities is not a list".to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .as_object()
                .map(normalize_entry)
                .ok_or_else(|| Error::Format(format!("vulnerability #{} is not an object", index)))
        })
        .collect()
}

fn normalize_entry(entry: &Map<String, Value>) -> CveRecord {
    let text = |key: &str| entry.get(key).and_then(Value::as_str);

    CveRecord {
        id: text("cveID").unwrap_or(DEFAULT_ID).to_string(),
        description: text("shortDescription").unwrap_or(DEFAULT_DESCRIPTION).to_string(),
        severity: IMPORTED_SEVERITY.to_string(),
        published: text("dateAdded").unwrap_or(DEFAULT_PUBLISHED).to_string(),
        exploit_available: exploit_available(text("knownRansomwareCampaignUse")),
    }
}

/// Imports feed documents from the data directory into the CVE store
pub struct FeedImporter {
    data_dir: PathBuf,
}

impl FeedImporter {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.base_dir.clone(),
        }
    }

    /// Parse `document` and upsert its records as one batch, returning the
    /// number of records written.
    ///
    /// Parse and format errors leave the store untouched.
    pub fn import_document(&self, store: &mut CveStore, document: impl AsRef<[u8]>) -> Result<usize> {
        let records = parse_feed(document)?;
        store.upsert_many(&records)
    }

    /// Import a feed file by name from the data directory
    pub fn import_file(&self, store: &mut CveStore, file_name: &str) -> Result<ImportReport> {
        let path = self.data_dir.join(file_name);
        tracing::info!(file = file_name, "importing feed");

        let bytes = std::fs::read(&path)?;

        match self.import_document(store, &bytes) {
            Ok(records_written) => {
                tracing::info!(file = file_name, records_written, "feed imported");
                Ok(ImportReport {
                    file_name: file_name.to_string(),
                    records_written,
                    content_hash: hash_bytes(&bytes),
                })
            }
            Err(e) => {
                tracing::warn!(file = file_name, error = %e, "feed import failed");
                Err(e)
            }
        }
    }
}
