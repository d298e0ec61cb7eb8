//! The process-scoped payment history projection.
use std::sync::{Arc, RwLock};

use log::debug;

use crate::{
    db_types::{HistoryEntry, PaymentStatus},
    traits::{PaymentRecordStore, PaymentStoreError},
};

/// An append-only, process-lifetime log of terminal payment outcomes.
///
/// The log is an explicit handle, constructed once at startup and cloned into whichever component needs to
/// append or read. It is a denormalized projection of the record store, never the source of truth: pending
/// attempts are not listed, and the whole log can be rebuilt from the store at any time.
///
/// Appends are safe under concurrent callers. The order of entries reflects some valid interleaving of
/// completions, oldest first.
#[derive(Clone, Default)]
pub struct PaymentHistory {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl PaymentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
    }

    pub fn extend(&self, new_entries: impl IntoIterator<Item = HistoryEntry>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.extend(new_entries);
    }

    /// A point-in-time copy of the log, in insertion order.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the log with the terminal attempts currently in the record store, in insertion order.
    /// Returns the number of entries after the rebuild.
    pub async fn rebuild_from_store<B: PaymentRecordStore>(&self, store: &B) -> Result<usize, PaymentStoreError> {
        let attempts = store.fetch_all_attempts().await?;
        let rebuilt: Vec<HistoryEntry> =
            attempts.iter().filter(|a| a.status != PaymentStatus::Pending).map(HistoryEntry::from).collect();
        let count = rebuilt.len();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        *entries = rebuilt;
        debug!("📜️ Payment history rebuilt with {count} entries");
        Ok(count)
    }
}
