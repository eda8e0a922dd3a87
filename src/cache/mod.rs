//! Cache Module
//!
//! Provides bounded in-memory memoization of query results with TTL
//! expiration, oldest-first eviction, and tag-based grouped invalidation.

mod entry;
mod order;
mod query;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionTracker;
pub use query::{CachedQuery, SharedQueryCache};
pub use stats::{CacheSnapshot, CacheStats, EntryInfo};
pub use store::{Invalidation, QueryCache, SetOptions};

// == Public Constants ==
/// Default TTL applied when an entry is inserted without one
pub const DEFAULT_TTL_MS: u64 = 60_000;

/// Default maximum number of entries
pub const DEFAULT_MAX_ENTRIES: usize = 100;
