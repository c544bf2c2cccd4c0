//! Cache Module
//!
//! Provides an in-memory byte cache whose entries are swept once they
//! outlive a fixed interval.

mod entry;
mod handle;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::{Cache, ReadMode};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Sweep interval used when none is configured
pub const DEFAULT_INTERVAL_SECS: u64 = 90;
