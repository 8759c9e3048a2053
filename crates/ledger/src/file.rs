//! File-based cost ledger with persistent JSONL storage.
//!
//! Each line is a JSON-encoded `LedgerEntry`. Entries are loaded into
//! memory on open and every `append` writes one new line to the file, so
//! past records are never rewritten. Appends hold a mutex across the whole
//! read-modify-write, which serializes concurrent writers.
//!
//! Storage location: `~/.skybroker/ledger.jsonl`

use async_trait::async_trait;
use skybroker_core::error::LedgerError;
use skybroker_core::ledger::{LedgerEntry, LedgerStore};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{fold_today, fold_total};

/// A file-backed, append-only cost ledger.
pub struct FileLedger {
    path: PathBuf,
    entries: Mutex<Vec<LedgerEntry>>,
}

impl FileLedger {
    /// Open a ledger at the given path, loading any existing entries.
    /// A missing file means an empty ledger; it is created on first append.
    pub fn open(path: PathBuf) -> Self {
        let entries = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = entries.len(), "Cost ledger loaded");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Default path: `~/.skybroker/ledger.jsonl`
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".skybroker").join("ledger.jsonl")
    }

    fn load_from_disk(path: &PathBuf) -> Vec<LedgerEntry> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(), // No file yet, start empty
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<LedgerEntry>(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted ledger line");
                    None
                }
            })
            .collect()
    }

    /// Append one serialized entry line to the backing file.
    fn write_line(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LedgerError::Storage(format!("Failed to create ledger directory: {e}"))
            })?;
        }

        let line = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Serialization(format!("Failed to serialize entry: {e}")))?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LedgerError::Storage(format!("Failed to open ledger file: {e}")))?;

        writeln!(file, "{line}")
            .map_err(|e| LedgerError::Storage(format!("Failed to write ledger entry: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FileLedger {
    fn name(&self) -> &str {
        "file"
    }

    async fn append(&self, entry: LedgerEntry) -> Result<String, LedgerError> {
        let mut entries = self.entries.lock().await;
        // Durable write first; the in-memory view only reflects recorded spend
        self.write_line(&entry)?;
        let id = entry.id.clone();
        info!(archive_id = %entry.archive_id, cost = entry.cost, "Recorded spend");
        entries.push(entry);
        Ok(id)
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn total_spent(&self) -> Result<f64, LedgerError> {
        Ok(fold_total(&self.entries.lock().await))
    }

    async fn spent_today(&self) -> Result<f64, LedgerError> {
        Ok(fold_today(&self.entries.lock().await))
    }

    async fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.entries.lock().await.len())
    }
}
