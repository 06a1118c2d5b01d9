//! Property-Based Tests for the Token Cache
//!
//! Uses proptest to check codec, shard and sharded-cache behaviour over
//! generated inputs, plus a multi-threaded stress run.

use proptest::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::cache::{current_timestamp_ms, Shard, ShardedCache};
use crate::error::AuthError;
use crate::token::{Claims, TokenCodec};

// == Test Configuration ==
const TEST_SECRET: &str = "property-test-secret";
const FAR_FUTURE: i64 = i64::MAX;
const ISSUED_AT: i64 = 1_700_000_000;

fn codec() -> TokenCodec {
    TokenCodec::new(TEST_SECRET, Duration::from_secs(24 * 3600)).unwrap()
}

// == Strategies ==
fn claims_strategy() -> impl Strategy<Value = Claims> {
    (
        any::<u64>(),
        "[A-Za-z]{1,12}",
        "[a-z0-9]{1,10}@[a-z]{1,8}\\.com",
        1i64..1_000_000,
    )
        .prop_map(|(user_id, role, email, lifetime)| {
            Claims::new(user_id, role, email, ISSUED_AT, lifetime)
        })
}

/// Token-shaped keys: three base64url-ish segments.
fn token_key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{4,20}\\.[A-Za-z0-9_-]{4,40}\\.[A-Za-z0-9_-]{4,20}"
}

#[derive(Debug, Clone)]
enum ShardOp {
    Put(usize),
    Get(usize),
}

fn shard_op_strategy() -> impl Strategy<Value = ShardOp> {
    prop_oneof![
        (0usize..20).prop_map(ShardOp::Put),
        (0usize..20).prop_map(ShardOp::Get),
    ]
}

fn test_claims(user_id: u64) -> Claims {
    Claims::new(user_id, "User", "user@example.com", ISSUED_AT, 3600)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Verifying a freshly signed token returns the claims that were signed.
    #[test]
    fn prop_codec_roundtrip(claims in claims_strategy()) {
        let codec = codec();
        let token = codec.sign(&claims).unwrap();

        let verified = codec.verify_at(&token, ISSUED_AT).unwrap();
        prop_assert_eq!(verified, claims);
    }

    // A token is valid strictly before its expiration and expired from then on.
    #[test]
    fn prop_codec_expiration(
        claims in claims_strategy(),
        before in 1i64..1_000_000,
        after in 0i64..1_000_000,
    ) {
        let codec = codec();
        let token = codec.sign(&claims).unwrap();

        let valid_at = (claims.exp - before).max(claims.iat);
        prop_assert!(codec.verify_at(&token, valid_at).is_ok());
        prop_assert_eq!(
            codec.verify_at(&token, claims.exp + after),
            Err(AuthError::ExpiredToken)
        );
    }

    // Tokens signed with any other algorithm are rejected, even with the right secret.
    #[test]
    fn prop_codec_rejects_other_algorithms(
        claims in claims_strategy(),
        alg in prop_oneof![Just(Algorithm::HS384), Just(Algorithm::HS512)],
    ) {
        let token = encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        prop_assert_eq!(codec().verify_at(&token, ISSUED_AT), Err(AuthError::InvalidToken));
    }

    // Caching never changes the claims handed back.
    #[test]
    fn prop_cache_transparency(
        entries in prop::collection::hash_map(token_key_strategy(), claims_strategy(), 1..40)
    ) {
        let cache = ShardedCache::new(8, 64);

        for (key, claims) in &entries {
            cache.put(key, claims.clone(), FAR_FUTURE);
            prop_assert_eq!(cache.get(key), Some(claims.clone()));
        }
        for (key, claims) in &entries {
            prop_assert_eq!(cache.get(key), Some(claims.clone()));
        }
    }

    // A shard behaves exactly like a reference LRU list: never above
    // capacity, and always evicting the least recently used key.
    #[test]
    fn prop_shard_matches_lru_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(shard_op_strategy(), 1..100),
    ) {
        let shard = Shard::new(capacity);
        // Most recently used first.
        let mut model: Vec<String> = Vec::new();

        for op in ops {
            match op {
                ShardOp::Put(n) => {
                    let key = format!("token-{}", n);
                    let expected_eviction = !model.contains(&key) && model.len() == capacity;
                    if let Some(pos) = model.iter().position(|k| *k == key) {
                        model.remove(pos);
                    } else if model.len() == capacity {
                        model.pop();
                    }
                    model.insert(0, key.clone());

                    let evicted = shard.put(&key, test_claims(n as u64), FAR_FUTURE);
                    prop_assert_eq!(evicted, expected_eviction);
                }
                ShardOp::Get(n) => {
                    let key = format!("token-{}", n);
                    let hit = shard.get(&key, 0).is_some();
                    if let Some(pos) = model.iter().position(|k| *k == key) {
                        let k = model.remove(pos);
                        model.insert(0, k);
                        prop_assert!(hit);
                    } else {
                        prop_assert!(!hit);
                    }
                }
            }

            prop_assert!(shard.stats().0 <= capacity);
            prop_assert_eq!(shard.keys(), model.clone());
        }
        prop_assert!(shard.is_consistent());
    }

    // Entries past their cache expiration are never served and are swept.
    #[test]
    fn prop_expired_entries_are_purged(
        keys in prop::collection::hash_set(token_key_strategy(), 1..30),
        age in 1i64..1_000_000,
    ) {
        let now = current_timestamp_ms();
        let cache = ShardedCache::new(4, 64);
        for (i, key) in keys.iter().enumerate() {
            cache.put(key, test_claims(i as u64), now - age);
        }

        let first = keys.iter().next().unwrap();
        prop_assert_eq!(cache.get(first), None);

        prop_assert_eq!(cache.clean_all_expired(), keys.len() - 1);
        prop_assert_eq!(cache.len(), 0);
    }
}

// == Concurrency Stress ==
#[test]
fn stress_concurrent_get_put_keeps_shards_consistent() {
    const THREADS: usize = 8;
    const OPS_PER_THREAD: usize = 5_000;
    const KEYS: usize = 96;

    // Small shards so evictions happen constantly.
    let cache = ShardedCache::new(4, 8);
    let lookups = AtomicU64::new(0);
    let now = current_timestamp_ms();

    std::thread::scope(|scope| {
        for t in 0..THREADS {
            let cache = &cache;
            let lookups = &lookups;
            scope.spawn(move || {
                // Cheap deterministic per-thread sequence.
                let mut state = (t as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                for _ in 0..OPS_PER_THREAD {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    let n = (state % KEYS as u64) as usize;
                    let key = format!("hdr.payload-{}.sig", n);

                    match (state >> 32) % 4 {
                        0 => {
                            // Some entries are already expired to exercise lazy purging.
                            let expires_at = if n % 5 == 0 { now - 1 } else { FAR_FUTURE };
                            cache.put(&key, test_claims(n as u64), expires_at);
                        }
                        1 if t == 0 => {
                            cache.clean_all_expired();
                        }
                        _ => {
                            lookups.fetch_add(1, Ordering::Relaxed);
                            if let Some(claims) = cache.get(&key) {
                                assert_eq!(claims.user_id, n as u64);
                            }
                        }
                    }
                }
            });
        }
    });

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, lookups.load(Ordering::Relaxed));
    assert!(stats.size <= stats.capacity);
    for shard in cache.shards() {
        assert!(shard.is_consistent(), "shard list and index diverged");
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_bound_single_shard() {
        let cache = ShardedCache::new(1, 10);
        for i in 0..1_000u64 {
            cache.put(&format!("key-{}", i), test_claims(i), FAR_FUTURE);
            assert!(cache.len() <= 10);
        }
        assert_eq!(cache.stats().evictions, 990);
    }
}
