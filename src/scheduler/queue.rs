//! Priority Queue
//!
//! Holds references to batches that the processor has not picked up yet.
//!
//! `push` only appends; ordering is established by an explicit `reorder` pass
//! right before entries are taken off the front. Ordering key is
//! `(priority weight, created_at)` ascending, so HIGH comes first and batches of
//! the same class stay FIFO. The sort is stable, which keeps the batches of one
//! ingestion (same key) in partition order.
//!
//! The entry list sits behind its own short-lived `parking_lot::Mutex`, distinct
//! from the processing permit held for a whole drain.

use super::types::QueueEntry;

use parking_lot::Mutex;
use std::collections::VecDeque;

pub struct PriorityQueue {
    entries: Mutex<VecDeque<QueueEntry>>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends an entry in arrival order.
    pub fn push(&self, entry: QueueEntry) {
        tracing::debug!("Queued batch {} (weight {})", entry.batch_id, entry.weight);
        self.entries.lock().push_back(entry);
    }

    /// Appends several entries under a single lock acquisition.
    pub fn extend<I>(&self, entries: I)
    where
        I: IntoIterator<Item = QueueEntry>,
    {
        self.entries.lock().extend(entries);
    }

    /// Re-sorts all pending entries by `(weight, created_at)`. Idempotent.
    pub fn reorder(&self) {
        let mut entries = self.entries.lock();
        entries.make_contiguous().sort_by_key(QueueEntry::sort_key);
        tracing::trace!("Reordered {} pending entries", entries.len());
    }

    /// Removes and returns the entry at the front, or `None` when empty.
    pub fn pop_front(&self) -> Option<QueueEntry> {
        self.entries.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of the pending entries in their current order.
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.lock().iter().cloned().collect()
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
