//! Cache Statistics Module
//!
//! Tracks cache performance metrics and backs the observability snapshot.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries evicted under size pressure
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expiration ==
    /// Increments the expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Entry Info ==
/// Per-entry observability record exposed by the cache snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// The entry's key
    pub key: String,
    /// Age since insertion, in milliseconds
    pub age_ms: u64,
    /// Tags attached at insertion
    pub tags: Vec<String>,
}

// == Cache Snapshot ==
/// Point-in-time view of the cache for observability.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    /// Current number of entries
    pub size: usize,
    /// Configured maximum number of entries
    pub max_entries: usize,
    /// One record per live entry
    pub entries: Vec<EntryInfo>,
    /// Performance counters
    pub stats: CacheStats,
}

impl CacheSnapshot {
    /// Returns true if the snapshot lists the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }
}
