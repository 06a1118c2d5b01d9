//! Cache Statistics Module
//!
//! Process-wide hit, miss and eviction counters plus the snapshot reported
//! to monitoring.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Counters ==
/// Advisory counters, updated without locking.
#[derive(Debug, Default)]
pub struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns `(hits, misses, evictions)`.
    pub fn load(&self) -> (u64, u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.evictions.load(Ordering::Relaxed),
        )
    }
}

// == Cache Stats ==
/// Point-in-time view of the whole cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Live entries across all shards
    pub size: usize,
    /// Sum of shard capacities
    pub capacity: usize,
    /// hits / (hits + misses) as a percentage
    pub hit_rate: f64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    pub fn new(size: usize, capacity: usize, hits: u64, misses: u64, evictions: u64) -> Self {
        Self {
            size,
            capacity,
            hit_rate: hit_rate(hits, misses),
            hits,
            misses,
            evictions,
        }
    }

    /// Total lookups observed.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Percentage of lookups that hit, 0.0 before any lookup.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}
