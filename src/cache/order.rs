//! Insertion Order Module
//!
//! Tracks insertion order of cache keys for oldest-first eviction.
//!
//! Eviction under size pressure removes the entry with the smallest
//! insertion timestamp, not the least-recently-accessed one: reads never
//! reorder the queue, only writes do. Overwriting a key resets its
//! insertion timestamp and therefore moves it to the back.

use std::collections::VecDeque;

// == Insertion Tracker ==
/// Tracks the order in which keys were inserted.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion
/// - Back = Newest insertion
#[derive(Debug, Default)]
pub struct InsertionTracker {
    /// Keys in insertion order
    order: VecDeque<String>,
}

impl InsertionTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Registers a key as the newest insertion.
    ///
    /// If the key is already tracked (overwrite), its old position is
    /// discarded first.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest-inserted key.
    ///
    /// Returns None if the tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the oldest-inserted key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }

    // == Clear ==
    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_new() {
        let tracker = InsertionTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.len(), 0);
        assert_eq!(tracker.peek_oldest(), None);
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut tracker = InsertionTracker::new();

        tracker.record("key1");
        tracker.record("key2");
        tracker.record("key3");

        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.peek_oldest(), Some(&"key1".to_string()));
    }

    #[test]
    fn test_record_overwrite_moves_to_back() {
        let mut tracker = InsertionTracker::new();

        tracker.record("key1");
        tracker.record("key2");

        // Overwriting key1 resets its insertion position
        tracker.record("key1");

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.pop_oldest(), Some("key2".to_string()));
        assert_eq!(tracker.pop_oldest(), Some("key1".to_string()));
    }

    #[test]
    fn test_pop_oldest() {
        let mut tracker = InsertionTracker::new();

        tracker.record("a");
        tracker.record("b");
        tracker.record("c");

        assert_eq!(tracker.pop_oldest(), Some("a".to_string()));
        assert_eq!(tracker.pop_oldest(), Some("b".to_string()));
        assert_eq!(tracker.pop_oldest(), Some("c".to_string()));
        assert_eq!(tracker.pop_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut tracker = InsertionTracker::new();

        tracker.record("key1");
        tracker.record("key2");
        tracker.record("key3");

        tracker.remove("key2");

        assert_eq!(tracker.len(), 2);
        assert!(!tracker.contains("key2"));
        assert!(tracker.contains("key1"));
        assert!(tracker.contains("key3"));
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut tracker = InsertionTracker::new();

        tracker.record("key1");
        tracker.remove("nonexistent");

        assert_eq!(tracker.len(), 1);
        assert!(tracker.contains("key1"));
    }

    #[test]
    fn test_clear() {
        let mut tracker = InsertionTracker::new();

        tracker.record("key1");
        tracker.record("key2");
        tracker.clear();

        assert!(tracker.is_empty());
        assert_eq!(tracker.pop_oldest(), None);
    }
}
