//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A byte payload together with the instant it was stored.
///
/// Entries are never mutated in place: an overwrite replaces the whole entry,
/// so `created_at` is fixed for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Vec<u8>,
    /// Insertion instant (monotonic, tokio clock)
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    // == Is Stale ==
    /// Checks whether the entry outlived `interval` as of `now`.
    ///
    /// Boundary condition: the entry is stale only once `created_at + interval`
    /// is strictly before `now`. An entry exactly `interval` old survives.
    pub fn is_stale_at(&self, interval: Duration, now: Instant) -> bool {
        self.created_at
            .checked_add(interval)
            .is_some_and(|deadline| deadline < now)
    }
}
