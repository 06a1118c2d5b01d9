//! Cache Entry Module
//!
//! Defines the value stored per token: decoded claims plus the cache-local
//! expiration instant.

use chrono::Utc;

use crate::token::Claims;

// == Cache Entry ==
/// Validated claims together with the instant they stop being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Claims produced by the codec
    pub claims: Claims,
    /// Cache expiration (Unix milliseconds)
    pub expires_at: i64,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(claims: Claims, expires_at: i64) -> Self {
        Self { claims, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now` (Unix milliseconds).
    ///
    /// Boundary condition: an entry is expired once `now` reaches
    /// `expires_at`, so it is never served at its expiration instant.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }
}

// == Residency ==
/// Cache expiration for freshly verified claims: the earlier of the token's
/// own expiration and `now + residency_ms`.
pub fn residency_deadline(claims: &Claims, now: i64, residency_ms: i64) -> i64 {
    claims
        .expires_at_ms()
        .min(now.saturating_add(residency_ms))
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
