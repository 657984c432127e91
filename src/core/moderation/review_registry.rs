// Pending review registry - in-memory map from review prompt id to the quarantined message.
//
// Nothing here survives a restart: every pending review is dropped when the process exits.

use super::moderation_models::ReviewRecord;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("A review with id {0} is already pending")]
    DuplicateKey(u64),
}

/// Concurrency-safe store of pending reviews.
///
/// **Why DashMap?**
/// Message and reaction events are handled in parallel tasks. DashMap shards its locks, and
/// `remove` takes the entry out under the shard's write lock, which is exactly the atomic
/// get-and-remove the decision flow needs.
#[derive(Default)]
pub struct ReviewRegistry {
    reviews: DashMap<u64, ReviewRecord>,
}

impl ReviewRegistry {
    pub fn new() -> Self {
        Self {
            reviews: DashMap::new(),
        }
    }

    /// Track a new review. Never overwrites an existing entry.
    pub fn put(&self, review_id: u64, record: ReviewRecord) -> Result<(), RegistryError> {
        match self.reviews.entry(review_id) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateKey(review_id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Look at a pending review without resolving it.
    #[cfg(test)]
    pub fn get(&self, review_id: u64) -> Option<ReviewRecord> {
        self.reviews.get(&review_id).map(|r| r.clone())
    }

    /// Remove and return a pending review in one step.
    ///
    /// Of any number of concurrent callers for the same id, exactly one gets `Some`.
    pub fn take_if_present(&self, review_id: u64) -> Option<ReviewRecord> {
        self.reviews.remove(&review_id).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Snapshot of every pending review, oldest first.
    pub fn pending(&self) -> Vec<ReviewRecord> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut records: Vec<ReviewRecord> =
            self.reviews.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|r| r.quarantined_at);
        records
    }
}
