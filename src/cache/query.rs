//! Cached Query Module
//!
//! Get-or-populate wrapper around the query cache for asynchronous fetches.
//!
//! A hit returns the cached value without constructing the fetch future at
//! all. A cold miss runs the fetch once and stores the result. Concurrent
//! cold misses on the same key are coalesced: callers serialize on a
//! per-key in-flight guard and the losers are served the winner's cached
//! result instead of fetching again. Fetch failures propagate unmodified
//! and cache nothing, so later callers re-attempt.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{QueryCache, SetOptions};

/// Shared handle to a query cache, as owned by concurrent callers.
pub type SharedQueryCache<V> = Arc<RwLock<QueryCache<V>>>;

// == Cached Query ==
/// Memoizing wrapper combining a shared cache with per-key fetch coalescing.
pub struct CachedQuery<V> {
    cache: SharedQueryCache<V>,
    /// One guard per key with a fetch currently in flight
    inflight: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl<V> Clone for CachedQuery<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            inflight: Arc::clone(&self.inflight),
        }
    }
}

impl<V: Clone> CachedQuery<V> {
    // == Constructor ==
    /// Wraps an existing shared cache.
    pub fn new(cache: SharedQueryCache<V>) -> Self {
        Self {
            cache,
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Builds a fresh cache with the given bounds and wraps it.
    pub fn with_cache(max_entries: usize, default_ttl: std::time::Duration) -> Self {
        Self::new(Arc::new(RwLock::new(QueryCache::new(max_entries, default_ttl))))
    }

    /// The underlying shared cache, for invalidation and observability.
    pub fn cache(&self) -> &SharedQueryCache<V> {
        &self.cache
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, fetching and storing it on a miss.
    ///
    /// The fetch closure is invoked at most once per call, and not at all on
    /// a hit. On fetch failure the error propagates to the caller unmodified
    /// and no entry is created, so a subsequent call re-attempts the fetch.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        options: SetOptions,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        // Fast path: no fetch future is ever constructed on a hit.
        if let Some(value) = self.cache.write().await.get(key) {
            return Ok(value);
        }

        // Cold path: serialize with any concurrent fetch for this key.
        let guard = {
            let mut inflight = self.inflight.lock().await;
            inflight
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let held = guard.lock().await;

        // A concurrent caller may have populated the cache while we waited.
        if let Some(value) = self.cache.write().await.get(key) {
            drop(held);
            self.release(key, &guard).await;
            debug!(key = %key, "coalesced onto concurrent fetch result");
            return Ok(value);
        }

        let result = fetch().await;

        if let Ok(value) = &result {
            self.cache.write().await.set(key, value.clone(), options);
        } else {
            debug!(key = %key, "fetch failed, nothing cached");
        }

        drop(held);
        self.release(key, &guard).await;
        result
    }

    // == Release ==
    /// Drops the in-flight guard entry for a key once its fetch settled.
    ///
    /// Removal is keyed by guard identity: a caller settling late must not
    /// evict a newer guard registered for the same key by a later caller,
    /// or two fetches could run uncovered at once.
    async fn release(&self, key: &str, guard: &Arc<Mutex<()>>) {
        let mut inflight = self.inflight.lock().await;
        if inflight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, guard))
        {
            inflight.remove(key);
        }
    }
}
