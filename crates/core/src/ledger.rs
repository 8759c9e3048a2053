//! Cost ledger entry and the `LedgerStore` trait.
//!
//! The ledger is an append-only audit trail of confirmed spend. Running
//! totals are folds over the entries, never separately-stored counters, so
//! they cannot drift from the record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// One confirmed spend. Never modified or removed once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub archive_id: String,
    pub cost: f64,
    pub timestamp: DateTime<Utc>,
    /// Arbitrary order detail blob for audit.
    #[serde(default)]
    pub details: serde_json::Value,
}

impl LedgerEntry {
    pub fn new(archive_id: impl Into<String>, cost: f64, details: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            archive_id: archive_id.into(),
            cost,
            timestamp: Utc::now(),
            details,
        }
    }
}

/// Durable, append-only spend store.
///
/// `append` is the only mutator, and only a successful order confirmation
/// is permitted to call it. Implementations must serialize appends so
/// concurrent writers can neither corrupt the store nor lose an entry.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Durably append an entry, returning its id.
    async fn append(&self, entry: LedgerEntry) -> Result<String, LedgerError>;

    /// All entries, oldest first.
    async fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Sum of all recorded costs.
    async fn total_spent(&self) -> Result<f64, LedgerError>;

    /// Sum of costs recorded on the current UTC calendar day.
    async fn spent_today(&self) -> Result<f64, LedgerError>;

    /// Number of entries.
    async fn count(&self) -> Result<usize, LedgerError>;
}
