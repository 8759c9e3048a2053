//! Cost ledger backends: durable, append-only records of confirmed spend.
//!
//! Two implementations of `skybroker_core::LedgerStore`:
//! - `FileLedger`: JSONL file, one entry per line, appended durably.
//! - `MemoryLedger`: Vec-backed, for tests and ephemeral sessions.
//!
//! Totals are always folds over the entries; no counter is stored anywhere
//! it could drift from the record.

pub mod file;
pub mod in_memory;

pub use file::FileLedger;
pub use in_memory::MemoryLedger;

use chrono::Utc;
use skybroker_core::ledger::LedgerEntry;

pub(crate) fn fold_total(entries: &[LedgerEntry]) -> f64 {
    entries.iter().map(|e| e.cost).sum()
}

pub(crate) fn fold_today(entries: &[LedgerEntry]) -> f64 {
    let today = Utc::now().date_naive();
    entries
        .iter()
        .filter(|e| e.timestamp.date_naive() == today)
        .map(|e| e.cost)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn totals_fold_over_entries() {
        let mut yesterday = LedgerEntry::new("a", 10.0, serde_json::Value::Null);
        yesterday.timestamp = Utc::now() - Duration::days(1);
        let today = LedgerEntry::new("b", 2.5, serde_json::Value::Null);

        let entries = vec![yesterday, today];
        assert!((fold_total(&entries) - 12.5).abs() < 1e-10);
        assert!((fold_today(&entries) - 2.5).abs() < 1e-10);
    }

    #[test]
    fn empty_ledger_totals_are_zero() {
        assert_eq!(fold_total(&[]), 0.0);
        assert_eq!(fold_today(&[]), 0.0);
    }
}
