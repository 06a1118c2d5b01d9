//! Cache Module
//!
//! Sharded LRU cache of verified token claims with TTL expiration.

mod entry;
mod lru;
mod shard;
mod sharded;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, residency_deadline, CacheEntry};
pub use lru::LruTracker;
pub use shard::{Shard, MAX_CLEAN_BATCH};
pub use sharded::ShardedCache;
pub use stats::{hit_rate, CacheCounters, CacheStats};
