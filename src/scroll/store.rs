//! Bounded scroll position store.
//!
//! Maps route keys to last-known scroll offsets. Capacity is fixed at
//! construction; saving past capacity evicts the least recently touched record.
//! Reads never reorder the cache.

use crate::model::RouteKey;
use chrono::{DateTime, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Default number of routes remembered.
pub const DEFAULT_CAPACITY: usize = 100;

/// Last known scroll offset for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRecord {
    pub key: RouteKey,
    pub offset: f64,
    pub last_accessed: DateTime<Utc>,
}

/// LRU store of scroll offsets keyed by route.
///
/// Constructed once by the app shell and handed to the scroll coordinator;
/// there is no process-wide instance.
pub struct ScrollPositionStore {
    records: LruCache<RouteKey, ScrollRecord>,
}

impl ScrollPositionStore {
    /// Create a store holding at most `capacity` records.
    ///
    /// If capacity is 0, uses default of 100.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            records: LruCache::new(capacity),
        }
    }

    /// Last saved offset for `key`, or `0` if absent.
    ///
    /// Does not touch recency. A corrupt record (non-finite or negative
    /// offset) reads as a miss.
    pub fn get(&self, key: &RouteKey) -> f64 {
        match self.records.peek(key) {
            Some(record) if record.offset.is_finite() && record.offset >= 0.0 => record.offset,
            Some(record) => {
                warn!(key = %key, offset = record.offset, "Corrupt scroll record, treating as miss");
                0.0
            }
            None => 0.0,
        }
    }

    /// Full record for `key`, without touching recency.
    pub fn record(&self, key: &RouteKey) -> Option<&ScrollRecord> {
        self.records.peek(key)
    }

    /// Insert or update the offset for `key` and mark it most recently used.
    ///
    /// Last write wins. When full, the least recently touched record is evicted first.
    pub fn save(&mut self, key: RouteKey, offset: f64) {
        let record = ScrollRecord {
            key: key.clone(),
            offset,
            last_accessed: Utc::now(),
        };
        if let Some((evicted, _)) = self.records.push(key.clone(), record) {
            if evicted != key {
                debug!(evicted = %evicted, "Scroll store at capacity, evicted oldest record");
            }
        }
    }

    /// Remove the record for `key`.
    pub fn clear(&mut self, key: &RouteKey) {
        self.records.pop(key);
    }

    /// Remove every record.
    pub fn clear_all(&mut self) {
        self.records.clear();
    }

    pub fn contains(&self, key: &RouteKey) -> bool {
        self.records.contains(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.records.cap().get()
    }
}

impl Default for ScrollPositionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for ScrollPositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollPositionStore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
