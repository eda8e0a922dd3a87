//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and tags.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Tags are write-once: they are fixed at insertion and never merged or
/// appended afterwards. Overwriting a key replaces the whole entry,
/// including its tags and insertion timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion time (monotonic)
    pub inserted_at: Instant,
    /// Duration after which the entry is considered stale
    pub ttl: Duration,
    /// Tags used for grouped invalidation
    pub tags: Vec<String>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with the given TTL and tags.
    pub fn new(value: V, ttl: Duration, tags: Vec<String>) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
            tags,
        }
    }

    // == Age ==
    /// Returns the time elapsed since insertion.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is stale once its age strictly exceeds
    /// its TTL. An entry whose age equals its TTL exactly is still alive.
    pub fn is_expired(&self) -> bool {
        self.age() > self.ttl
    }

    // == Tag Intersection ==
    /// Returns true if any of the given tags matches one of this entry's tags.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("v".to_string(), Duration::from_secs(60), vec![]);

        assert_eq!(entry.value, "v");
        assert!(entry.tags.is_empty());
        assert!(!entry.is_expired());
        assert!(entry.age() < Duration::from_secs(1));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("v".to_string(), Duration::from_millis(50), vec![]);

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_zero_ttl_expires_immediately_after_elapse() {
        let entry = CacheEntry::new("v".to_string(), Duration::ZERO, vec![]);

        // Any measurable elapsed time exceeds a zero TTL.
        sleep(Duration::from_millis(5));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_tag_intersection() {
        let entry = CacheEntry::new(
            1u32,
            Duration::from_secs(60),
            vec!["ideas".to_string(), "drafts".to_string()],
        );

        assert!(entry.has_any_tag(&["drafts".to_string()]));
        assert!(entry.has_any_tag(&["events".to_string(), "ideas".to_string()]));
        assert!(!entry.has_any_tag(&["events".to_string()]));
        assert!(!entry.has_any_tag(&[]));
    }

    #[test]
    fn test_untagged_entry_never_intersects() {
        let entry = CacheEntry::new(1u32, Duration::from_secs(60), vec![]);
        assert!(!entry.has_any_tag(&["ideas".to_string()]));
    }
}
