//! TTL Cleanup Task
//!
//! Background task that periodically purges expired cache entries, so stale
//! data is reclaimed even when read traffic never touches it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedQueryCache;

/// Spawns a background task that periodically removes expired cache entries.
///
/// The task loops forever, sleeping for the given interval between passes
/// and taking a write lock on the cache for each sweep. The owning process
/// is expected to hold the returned handle and abort it on shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(QueryCache::from_config(&config)));
/// let handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval());
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: SharedQueryCache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "starting cache cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup()
            };

            if removed > 0 {
                info!(removed, "cache cleanup removed expired entries");
            } else {
                debug!("cache cleanup found no expired entries");
            }
        }
    })
}
