//! Cache Store Module
//!
//! The unsynchronised entry map behind the cache handle. Locking lives one
//! level up in [`crate::cache::Cache`]; everything here assumes the caller
//! already holds the appropriate side of the lock.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::CacheEntry;

// == Cache Store ==
/// Key to entry mapping plus the running total of reaped entries.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Entries removed by sweeps since creation
    reaped: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Stores `value` under `key`, replacing any previous entry wholesale.
    ///
    /// The replacement carries a fresh timestamp, so an overwritten key
    /// starts aging from zero again.
    pub fn insert(&mut self, key: String, value: Vec<u8>) {
        self.entries.insert(key, CacheEntry::new(value));
    }

    // == Get ==
    /// Returns the entry stored under `key`, regardless of its age.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Sweep ==
    /// Removes every entry that outlived `interval` as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, interval: Duration, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_stale_at(interval, now));

        let removed = before - self.entries.len();
        self.reaped += removed as u64;
        removed
    }

    // == Reaped ==
    /// Total entries removed by sweeps.
    pub fn reaped(&self) -> u64 {
        self.reaped
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.reaped(), 0);
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = CacheStore::new();

        store.insert("key1".to_string(), b"value1".to_vec());
        let entry = store.get("key1").unwrap();

        assert_eq!(entry.value, b"value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = CacheStore::new();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new();

        store.insert("key1".to_string(), b"value1".to_vec());
        store.insert("key1".to_string(), b"value2".to_vec());

        assert_eq!(store.get("key1").unwrap().value, b"value2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_resets_timestamp() {
        let mut store = CacheStore::new();

        store.insert("key1".to_string(), b"value1".to_vec());
        let first = store.get("key1").unwrap().created_at;
        std::thread::sleep(Duration::from_millis(5));
        store.insert("key1".to_string(), b"value2".to_vec());

        assert!(store.get("key1").unwrap().created_at > first);
    }

    #[test]
    fn test_store_get_ignores_age() {
        let mut store = CacheStore::new();
        store.insert("key1".to_string(), b"value1".to_vec());

        // Lookups never check staleness; only sweeps remove entries
        std::thread::sleep(Duration::from_millis(20));
        assert!(store.get("key1").is_some());
    }

    #[test]
    fn test_store_sweep_removes_only_stale() {
        let mut store = CacheStore::new();
        store.insert("old".to_string(), b"1".to_vec());
        std::thread::sleep(Duration::from_millis(5));
        store.insert("fresh".to_string(), b"2".to_vec());

        // Sweep exactly one interval after "fresh" was stored
        let now = store.get("fresh").unwrap().created_at + INTERVAL;
        let removed = store.sweep(INTERVAL, now);

        assert_eq!(removed, 1);
        assert!(store.get("old").is_none());
        assert!(store.get("fresh").is_some());
        assert_eq!(store.reaped(), 1);
    }

    #[test]
    fn test_store_sweep_keeps_entries_at_boundary() {
        let mut store = CacheStore::new();
        store.insert("key1".to_string(), b"value1".to_vec());
        let created = store.get("key1").unwrap().created_at;

        let removed = store.sweep(INTERVAL, created + INTERVAL);

        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_sweep_empty() {
        let mut store = CacheStore::new();
        assert_eq!(store.sweep(INTERVAL, Instant::now()), 0);
        assert_eq!(store.reaped(), 0);
    }

    #[test]
    fn test_store_reaped_accumulates() {
        let mut store = CacheStore::new();
        store.insert("a".to_string(), Vec::new());
        let later = store.get("a").unwrap().created_at + INTERVAL * 2;
        store.sweep(INTERVAL, later);

        store.insert("b".to_string(), Vec::new());
        let later = store.get("b").unwrap().created_at + INTERVAL * 2;
        store.sweep(INTERVAL, later);

        assert_eq!(store.reaped(), 2);
        assert!(store.is_empty());
    }
}
