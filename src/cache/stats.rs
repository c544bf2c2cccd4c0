//! Cache Statistics Module
//!
//! Tracks lookup outcomes and reaper activity.

use std::sync::atomic::{AtomicU64, Ordering};

// == Cache Stats ==
/// Point-in-time snapshot of cache metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Number of lookups that found the key
    pub hits: u64,
    /// Number of lookups that did not
    pub misses: u64,
    /// Number of entries removed by reaper sweeps
    pub reaped: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Lookup Counters ==
/// Hit and miss counters updated outside the entry lock.
///
/// Lookups only hold the shared side of the lock, so the counters live in
/// atomics rather than behind it.
#[derive(Debug, Default)]
pub(crate) struct LookupCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LookupCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.reaped, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_lookup_counters() {
        let counters = LookupCounters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();

        assert_eq!(counters.hits(), 2);
        assert_eq!(counters.misses(), 1);
    }
}
