//! In-memory ledger for testing and ephemeral sessions.

use async_trait::async_trait;
use skybroker_core::error::LedgerError;
use skybroker_core::ledger::{LedgerEntry, LedgerStore};
use tokio::sync::RwLock;

use crate::{fold_today, fold_total};

/// A Vec-backed ledger with no persistence.
pub struct MemoryLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn append(&self, entry: LedgerEntry) -> Result<String, LedgerError> {
        let id = entry.id.clone();
        self.entries.write().await.push(entry);
        Ok(id)
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.entries.read().await.clone())
    }

    async fn total_spent(&self) -> Result<f64, LedgerError> {
        Ok(fold_total(&self.entries.read().await))
    }

    async fn spent_today(&self) -> Result<f64, LedgerError> {
        Ok(fold_today(&self.entries.read().await))
    }

    async fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.entries.read().await.len())
    }
}
