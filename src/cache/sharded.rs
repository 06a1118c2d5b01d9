//! Sharded Cache Module
//!
//! Routes each token to one of N independently locked shards and keeps
//! process-wide statistics.

use tracing::trace;

use crate::cache::{current_timestamp_ms, CacheCounters, CacheStats, Shard};
use crate::config::Config;
use crate::token::Claims;

// == Sharded Cache ==
/// Concurrent token cache built from fixed-capacity LRU shards.
///
/// Each shard has its own lock, so contention is divided by the shard
/// count. Nothing here ever fails: a miss is a signal to verify the token,
/// not an error.
#[derive(Debug)]
pub struct ShardedCache {
    shards: Box<[Shard]>,
    mask: usize,
    counters: CacheCounters,
}

impl ShardedCache {
    // == Constructor ==
    /// Creates a cache of `shard_count` shards holding `shard_capacity`
    /// entries each. `shard_count` is rounded up to a power of two.
    pub fn new(shard_count: usize, shard_capacity: usize) -> Self {
        let shard_count = shard_count.max(1).next_power_of_two();
        let shards = (0..shard_count)
            .map(|_| Shard::new(shard_capacity))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            shards,
            mask: shard_count - 1,
            counters: CacheCounters::default(),
        }
    }

    /// Creates a cache from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.shard_count, config.shard_capacity)
    }

    // == Shard Selection ==
    /// Index of the shard owning `key`: 32-bit FNV-1a masked by the shard count.
    pub fn shard_index(&self, key: &str) -> usize {
        let mut hash: u32 = 2_166_136_261;
        for byte in key.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(16_777_619);
        }
        hash as usize & self.mask
    }

    fn shard(&self, key: &str) -> &Shard {
        &self.shards[self.shard_index(key)]
    }

    // == Get ==
    /// Looks up `key` against the current time.
    pub fn get(&self, key: &str) -> Option<Claims> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Looks up `key` as of `now` (Unix milliseconds). Every call counts as
    /// exactly one hit or one miss.
    pub fn get_at(&self, key: &str, now: i64) -> Option<Claims> {
        let found = self.shard(key).get(key, now);
        match found {
            Some(_) => {
                self.counters.record_hit();
                trace!("token cache hit");
            }
            None => {
                self.counters.record_miss();
                trace!("token cache miss");
            }
        }
        found
    }

    // == Put ==
    /// Caches `claims` under `key` until `expires_at` (Unix milliseconds).
    pub fn put(&self, key: &str, claims: Claims, expires_at: i64) {
        if self.shard(key).put(key, claims, expires_at) {
            self.counters.record_eviction();
        }
    }

    // == Cleanup Expired ==
    /// Runs one bounded expiry sweep over every shard and returns the number
    /// of entries removed.
    pub fn clean_all_expired(&self) -> usize {
        self.clean_all_expired_at(current_timestamp_ms())
    }

    pub fn clean_all_expired_at(&self, now: i64) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.clean_expired(now))
            .sum()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let (size, capacity) = self
            .shards
            .iter()
            .map(Shard::stats)
            .fold((0, 0), |(size, cap), (s, c)| (size + s, cap + c));
        let (hits, misses, evictions) = self.counters.load();

        CacheStats::new(size, capacity, hits, misses, evictions)
    }

    // == Length ==
    /// Returns the current number of entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.stats().0).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.shards.iter().map(Shard::capacity).sum()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub(crate) fn shards(&self) -> &[Shard] {
        &self.shards
    }
}
