//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order eviction,
//! TTL expiration, and tag-based grouped invalidation.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheSnapshot, CacheStats, EntryInfo, InsertionTracker};
use crate::config::Config;

// == Set Options ==
/// Per-entry options supplied at insertion.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// TTL override; the cache default applies when None
    pub ttl: Option<Duration>,
    /// Tags for grouped invalidation, fixed for the entry's lifetime
    pub tags: Vec<String>,
}

impl SetOptions {
    /// Options with an explicit TTL and no tags.
    pub fn ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            tags: Vec::new(),
        }
    }

    /// Options with tags and the default TTL.
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ttl: None,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds an explicit TTL to these options.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

// == Invalidation ==
/// Selects which entries an `invalidate` call removes.
///
/// The three filter semantics are distinct variants rather than optional
/// parameters, so a call site can never supply an ambiguous combination.
#[derive(Debug, Clone)]
pub enum Invalidation {
    /// Remove every entry
    Clear,
    /// Remove entries whose key contains the given substring
    ByPattern(String),
    /// Remove entries whose tag set intersects the given tags
    ByTags(Vec<String>),
}

// == Query Cache ==
/// Bounded in-memory memoization cache for query results.
///
/// Entries expire lazily on read once their TTL elapses; a periodic
/// [`cleanup`](QueryCache::cleanup) pass may additionally purge them
/// proactively. Insertion beyond `max_entries` evicts the single
/// oldest-by-insertion entry.
#[derive(Debug)]
pub struct QueryCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion-order tracker for oldest-first eviction
    order: InsertionTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied to entries without an explicit TTL
    default_ttl: Duration,
}

impl<V: Clone> QueryCache<V> {
    // == Constructor ==
    /// Creates a new QueryCache with the given capacity and default TTL.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
        }
    }

    /// Creates a new QueryCache from runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, config.default_ttl())
    }

    // == Set ==
    /// Inserts or overwrites an entry. Never fails.
    ///
    /// An overwrite replaces value, TTL, and tags, and resets the insertion
    /// timestamp. When the cache is at capacity and the key is new, the
    /// single oldest-by-insertion entry is evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: V, options: SetOptions) {
        if self.max_entries == 0 {
            return;
        }

        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.order.pop_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                debug!(key = %evicted_key, "evicted oldest entry under size pressure");
            }
        }

        let ttl = options.ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl, options.tags);

        debug!(
            key = %key,
            ttl_ms = ttl.as_millis() as u64,
            tags = ?entry.tags,
            overwrite = is_overwrite,
            "cache set"
        );

        self.entries.insert(key.clone(), entry);
        self.order.record(&key);
    }

    // == Get ==
    /// Returns a clone of the stored value if present and not expired.
    ///
    /// An expired entry is removed as a side effect (lazy expiration) and
    /// reported as a miss. Reads never reorder the eviction queue.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.order.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                debug!(key = %key, "cache entry expired on read");
                None
            }
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Contains ==
    /// Checks whether a live (non-expired) entry exists, without mutating.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| !e.is_expired())
    }

    // == Invalidate ==
    /// Removes the entries selected by the given mode.
    ///
    /// Enumeration is a linear scan of all entries, acceptable at the
    /// cache's bounded size. Returns the number of entries removed.
    pub fn invalidate(&mut self, mode: Invalidation) -> usize {
        let before = self.entries.len();

        match &mode {
            Invalidation::Clear => {
                self.entries.clear();
                self.order.clear();
            }
            Invalidation::ByPattern(pattern) => {
                let matched: Vec<String> = self
                    .entries
                    .keys()
                    .filter(|k| k.contains(pattern.as_str()))
                    .cloned()
                    .collect();
                for key in matched {
                    self.entries.remove(&key);
                    self.order.remove(&key);
                }
            }
            Invalidation::ByTags(tags) => {
                let matched: Vec<String> = self
                    .entries
                    .iter()
                    .filter(|(_, entry)| entry.has_any_tag(tags))
                    .map(|(key, _)| key.clone())
                    .collect();
                for key in matched {
                    self.entries.remove(&key);
                    self.order.remove(&key);
                }
            }
        }

        let removed = before - self.entries.len();
        debug!(?mode, removed, size = self.entries.len(), "cache invalidated");
        removed
    }

    // == Cleanup ==
    /// Proactively removes every expired entry.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.order.remove(&key);
            self.stats.record_expiration();
        }

        if count > 0 {
            debug!(removed = count, size = self.entries.len(), "cache cleanup");
        }
        count
    }

    // == Snapshot ==
    /// Returns a point-in-time observability view of the cache.
    pub fn snapshot(&self) -> CacheSnapshot {
        let entries = self
            .entries
            .iter()
            .map(|(key, entry)| EntryInfo {
                key: key.clone(),
                age_ms: entry.age().as_millis() as u64,
                tags: entry.tags.clone(),
            })
            .collect();

        CacheSnapshot {
            size: self.entries.len(),
            max_entries: self.max_entries,
            entries,
            stats: self.stats.clone(),
        }
    }

    // == Stats ==
    /// Returns current performance counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
