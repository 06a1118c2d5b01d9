//! Shard Module
//!
//! One fixed-capacity, lock-guarded LRU segment of the token cache.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::cache::{CacheEntry, LruTracker};
use crate::token::Claims;

/// Upper bound on nodes inspected by one `clean_expired` call.
pub const MAX_CLEAN_BATCH: usize = 100;

#[derive(Debug)]
struct ShardInner {
    index: HashMap<String, usize>,
    lru: LruTracker<CacheEntry>,
}

impl ShardInner {
    fn remove_at(&mut self, idx: usize) {
        if let Some((key, _)) = self.lru.remove(idx) {
            self.index.remove(&key);
        }
    }

    fn is_expired(&self, idx: usize, now: i64) -> bool {
        self.lru
            .value(idx)
            .map_or(true, |entry| entry.is_expired_at(now))
    }
}

// == Shard ==
/// Fixed-capacity LRU map from token to cached claims.
///
/// All list and index mutation happens under the write lock. Lookups start
/// under the read lock and re-check everything after taking the write lock,
/// since another thread may have removed, replaced or refreshed the entry
/// in between.
#[derive(Debug)]
pub struct Shard {
    capacity: usize,
    inner: RwLock<ShardInner>,
}

impl Shard {
    // == Constructor ==
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: RwLock::new(ShardInner {
                index: HashMap::with_capacity(capacity),
                lru: LruTracker::with_capacity(capacity),
            }),
        }
    }

    // == Get ==
    /// Returns a copy of the claims cached under `key`, if live at `now`
    /// (Unix milliseconds). A live hit becomes the most recently used entry;
    /// an expired one is removed.
    pub fn get(&self, key: &str, now: i64) -> Option<Claims> {
        // Misses never take the write lock.
        if !self.inner.read().index.contains_key(key) {
            return None;
        }

        let mut inner = self.inner.write();
        let idx = *inner.index.get(key)?;
        if inner.is_expired(idx, now) {
            inner.remove_at(idx);
            return None;
        }

        inner.lru.touch(idx);
        inner.lru.value(idx).map(|entry| entry.claims.clone())
    }

    // == Put ==
    /// Inserts or refreshes `key`. Returns whether the least recently used
    /// entry had to be evicted to make room.
    pub fn put(&self, key: &str, claims: Claims, expires_at: i64) -> bool {
        let mut inner = self.inner.write();

        if let Some(&idx) = inner.index.get(key) {
            if let Some(entry) = inner.lru.value_mut(idx) {
                entry.claims = claims;
                entry.expires_at = expires_at;
            }
            inner.lru.touch(idx);
            return false;
        }

        let mut evicted = false;
        if inner.index.len() >= self.capacity {
            if let Some(oldest) = inner.lru.oldest() {
                inner.remove_at(oldest);
                evicted = true;
            }
        }

        let idx = inner
            .lru
            .push_front(key.to_string(), CacheEntry::new(claims, expires_at));
        inner.index.insert(key.to_string(), idx);
        evicted
    }

    // == Clean Expired ==
    /// Removes expired entries, starting from the least recently used end.
    /// Inspects at most [`MAX_CLEAN_BATCH`] entries per call so one sweep
    /// never holds the lock for long.
    pub fn clean_expired(&self, now: i64) -> usize {
        let mut inner = self.inner.write();

        let mut removed = 0;
        let mut cursor = inner.lru.oldest();
        let mut checked = 0;
        while let Some(idx) = cursor {
            if checked >= MAX_CLEAN_BATCH {
                break;
            }
            // Read the neighbour before the node is recycled.
            cursor = inner.lru.newer(idx);
            if inner.is_expired(idx, now) {
                inner.remove_at(idx);
                removed += 1;
            }
            checked += 1;
        }
        removed
    }

    // == Stats ==
    /// Returns `(size, capacity)`.
    pub fn stats(&self) -> (usize, usize) {
        (self.inner.read().index.len(), self.capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().lru.keys().map(str::to_string).collect()
    }

    /// List links are intact and the list holds exactly the indexed keys.
    pub fn is_consistent(&self) -> bool {
        let inner = self.inner.read();
        inner.lru.is_consistent()
            && inner.lru.len() == inner.index.len()
            && inner.index.len() <= self.capacity
            && inner
                .index
                .iter()
                .all(|(key, &idx)| inner.lru.key(idx) == key)
    }
}
