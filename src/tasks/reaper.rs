//! Reaper Task
//!
//! Background task that periodically sweeps stale cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns the reaper for one cache instance.
///
/// Every `interval` the task takes the write lock once and removes, in a
/// single pass, each entry older than `interval`. The same duration is both
/// the tick period and the staleness threshold.
///
/// The loop ends when a shutdown message arrives on `shutdown_rx` or when the
/// sending side is dropped together with the last cache handle.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new()));
/// let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
/// let handle = spawn_reaper(store.clone(), Duration::from_secs(90), shutdown_rx);
/// // Later, during shutdown:
/// let _ = shutdown_tx.send(());
/// handle.await?;
/// ```
pub fn spawn_reaper(
    store: Arc<RwLock<CacheStore>>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // First tick completes immediately
        ticker.tick().await;

        info!(interval_ms = interval.as_millis() as u64, "Cache reaper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = {
                        let mut guard = store.write().await;
                        guard.sweep(interval, Instant::now())
                    };

                    if removed > 0 {
                        info!("Cache reaper: removed {} stale entries", removed);
                    } else {
                        debug!("Cache reaper: no stale entries found");
                    }
                }
                // Either an explicit stop or every sender dropped
                _ = shutdown_rx.recv() => {
                    info!("Cache reaper stopped");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(50);

    #[tokio::test(start_paused = true)]
    async fn test_reaper_removes_stale_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        store
            .write()
            .await
            .insert("expire_soon".to_string(), b"value".to_vec());

        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = spawn_reaper(store.clone(), INTERVAL, shutdown_rx);

        // Tick at 50ms keeps the entry (boundary), tick at 100ms removes it
        time::sleep(Duration::from_millis(150)).await;

        {
            let guard = store.read().await;
            assert!(guard.get("expire_soon").is_none());
            assert_eq!(guard.reaped(), 1);
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_preserves_fresh_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = spawn_reaper(store.clone(), INTERVAL, shutdown_rx);

        time::sleep(Duration::from_millis(120)).await;
        store
            .write()
            .await
            .insert("long_lived".to_string(), b"value".to_vec());

        // One more tick at 150ms; the entry is only 30ms old by then
        time::sleep(Duration::from_millis(40)).await;

        assert_eq!(
            store.read().await.get("long_lived").map(|e| e.value.clone()),
            Some(b"value".to_vec())
        );

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_stops_on_shutdown_signal() {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = spawn_reaper(store, INTERVAL, shutdown_rx);

        shutdown_tx.send(()).unwrap();
        handle.await.expect("reaper should exit cleanly");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_stops_when_sender_dropped() {
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let handle = spawn_reaper(store, INTERVAL, shutdown_rx);

        drop(shutdown_tx);
        handle.await.expect("reaper should exit cleanly");
    }
}
