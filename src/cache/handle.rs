//! Cache Handle Module
//!
//! The shareable, thread-safe front of the cache: owns the entry lock, the
//! lookup counters and the reaper's lifetime.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::stats::LookupCounters;
use crate::cache::{CacheStats, CacheStore};
use crate::error::{PokedexError, Result};
use crate::tasks::spawn_reaper;

// == Read Mode ==
/// How lookups treat entries that outlived the interval but were not swept yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Membership alone decides a hit; staleness is left to the reaper.
    #[default]
    Lazy,
    /// Entries older than the interval are reported as misses on read.
    /// They are still only removed by the reaper.
    Strict,
}

#[derive(Debug)]
struct CacheInner {
    store: Arc<RwLock<CacheStore>>,
    interval: Duration,
    mode: ReadMode,
    counters: LookupCounters,
    shutdown_tx: broadcast::Sender<()>,
    reaper: Mutex<Option<JoinHandle<()>>>,
}

// == Cache ==
/// Time-expiring byte cache keyed by string.
///
/// Cloning is cheap and every clone talks to the same entries. Lookups take
/// the shared side of the lock and never block each other; inserts and
/// reaper sweeps take the exclusive side.
///
/// The cache starts in the running state. After [`Cache::stop`] the mapping is
/// frozen: `add` and `get` keep working but nothing is swept any more.
/// Dropping the last clone also ends the reaper.
#[derive(Debug, Clone)]
pub struct Cache {
    inner: Arc<CacheInner>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache that sweeps every `interval` and starts its reaper.
    ///
    /// Fails with [`PokedexError::InvalidConfig`] for a zero interval or when
    /// called outside a tokio runtime; in both cases no reaper is spawned.
    pub fn new(interval: Duration) -> Result<Self> {
        Self::with_mode(interval, ReadMode::Lazy)
    }

    /// Same as [`Cache::new`] with an explicit [`ReadMode`].
    pub fn with_mode(interval: Duration, mode: ReadMode) -> Result<Self> {
        if interval.is_zero() {
            return Err(PokedexError::InvalidConfig(
                "cache interval must be greater than zero".to_string(),
            ));
        }
        if Handle::try_current().is_err() {
            return Err(PokedexError::InvalidConfig(
                "cache reaper requires a running tokio runtime".to_string(),
            ));
        }

        let store = Arc::new(RwLock::new(CacheStore::new()));
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let reaper = spawn_reaper(store.clone(), interval, shutdown_rx);

        info!(interval_ms = interval.as_millis() as u64, mode = ?mode, "Cache created");

        Ok(Self {
            inner: Arc::new(CacheInner {
                store,
                interval,
                mode,
                counters: LookupCounters::default(),
                shutdown_tx,
                reaper: Mutex::new(Some(reaper)),
            }),
        })
    }

    // == Add ==
    /// Inserts or replaces the entry for `key`, resetting its age to zero.
    pub async fn add(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let value = value.into();
        debug!(key = %key, bytes = value.len(), "Cache add");

        self.inner.store.write().await.insert(key, value);
    }

    // == Get ==
    /// Returns a copy of the payload stored under `key`.
    ///
    /// In [`ReadMode::Lazy`] an entry that has aged past the interval but
    /// has not been swept yet is still returned.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let found = {
            let guard = self.inner.store.read().await;
            guard
                .get(key)
                .filter(|entry| match self.inner.mode {
                    ReadMode::Lazy => true,
                    ReadMode::Strict => !entry.is_stale_at(self.inner.interval, Instant::now()),
                })
                .map(|entry| entry.value.clone())
        };

        if found.is_some() {
            self.inner.counters.record_hit();
            debug!(key = %key, "Cache hit");
        } else {
            self.inner.counters.record_miss();
            debug!(key = %key, "Cache miss");
        }

        found
    }

    // == Stop ==
    /// Signals the reaper to exit and waits for it.
    ///
    /// Idempotent; later calls return immediately.
    pub async fn stop(&self) {
        let Some(handle) = self.inner.reaper.lock().await.take() else {
            return;
        };

        // No receiver means the reaper already exited
        let _ = self.inner.shutdown_tx.send(());

        if let Err(err) = handle.await {
            warn!(error = %err, "Cache reaper ended abnormally");
        }
    }

    // == Is Running ==
    /// Returns true while the reaper is active.
    pub async fn is_running(&self) -> bool {
        self.inner
            .reaper
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let guard = self.inner.store.read().await;
        CacheStats {
            hits: self.inner.counters.hits(),
            misses: self.inner.counters.misses(),
            reaped: guard.reaped(),
            total_entries: guard.len(),
        }
    }

    /// Returns the number of entries currently stored.
    pub async fn len(&self) -> usize {
        self.inner.store.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.store.read().await.is_empty()
    }

    /// The sweep interval, which is also the staleness threshold.
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    pub fn read_mode(&self) -> ReadMode {
        self.inner.mode
    }
}
