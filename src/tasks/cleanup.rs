//! Token Cache Cleanup Task
//!
//! Background task that periodically removes expired cache entries. Reads
//! already ignore expired entries, so the sweep only bounds memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::ShardedCache;

/// Spawns a task that calls [`ShardedCache::clean_all_expired`] every
/// `interval` until `shutdown` is cancelled.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ShardedCache::new(16, 128));
/// let shutdown = CancellationToken::new();
/// let handle = start_background_cleanup(cache.clone(), Duration::from_secs(300), shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn start_background_cleanup(
    cache: Arc<ShardedCache>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting token cache cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; start with a full interval.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Token cache cleanup task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.clean_all_expired();
                    if removed > 0 {
                        info!("Token cache cleanup: removed {} expired entries", removed);
                    } else {
                        debug!("Token cache cleanup: no expired entries found");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::current_timestamp_ms;
    use crate::token::Claims;

    fn claims() -> Claims {
        Claims::new(1, "User", "user@example.com", 0, 3600)
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = Arc::new(ShardedCache::new(4, 16));
        cache.put("expire_soon", claims(), current_timestamp_ms() + 200);

        let shutdown = CancellationToken::new();
        let handle =
            start_background_cleanup(cache.clone(), Duration::from_millis(100), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(cache.len(), 0, "Expired entry should have been cleaned up");
        // Removal happened in the sweep, not through a lookup.
        assert_eq!(cache.stats().lookups(), 0);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = Arc::new(ShardedCache::new(4, 16));
        cache.put("long_lived", claims(), current_timestamp_ms() + 3_600_000);

        let shutdown = CancellationToken::new();
        let handle =
            start_background_cleanup(cache.clone(), Duration::from_millis(50), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(cache.get("long_lived"), Some(claims()));

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_on_cancel() {
        let cache = Arc::new(ShardedCache::new(1, 1));
        let shutdown = CancellationToken::new();
        let handle = start_background_cleanup(cache, Duration::from_secs(3600), shutdown.clone());

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cleanup task should stop after cancel")
            .unwrap();
    }
}
