//! Durable store for pending orders.
//!
//! A token-keyed map persisted as one JSON document. The broker serializes
//! all access behind a lock, so the store itself is plain synchronous code,
//! mirroring how the ledger file backend writes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use skybroker_core::{LedgerError, PendingOrder};

/// Token → pending order map, optionally backed by a JSON file.
#[derive(Debug, Default)]
pub struct PendingStore {
    path: Option<PathBuf>,
    orders: HashMap<String, PendingOrder>,
}

impl PendingStore {
    /// A purely in-memory store. Used by tests and one-shot tooling.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading whatever survived the last run.
    ///
    /// A missing file is an empty store; an unreadable one is logged and
    /// treated as empty rather than blocking startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let orders = Self::load_from_disk(&path);
        Self {
            path: Some(path),
            orders,
        }
    }

    fn load_from_disk(path: &Path) -> HashMap<String, PendingOrder> {
        if !path.exists() {
            return HashMap::new();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(orders) => orders,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Pending-order file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read pending-order file, starting empty");
                HashMap::new()
            }
        }
    }

    /// Write the whole map back out. No-op for in-memory stores.
    pub fn persist(&self) -> Result<(), LedgerError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LedgerError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.orders)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| LedgerError::Storage(e.to_string()))
    }

    pub fn get(&self, token: &str) -> Option<&PendingOrder> {
        self.orders.get(token)
    }

    pub fn get_mut(&mut self, token: &str) -> Option<&mut PendingOrder> {
        self.orders.get_mut(token)
    }

    pub fn insert(&mut self, order: PendingOrder) {
        self.orders.insert(order.token.clone(), order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
