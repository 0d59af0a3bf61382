//! Opt-in background purge of expired entries.
//!
//! Without a sweeper, a key that expires and is never read again stays
//! allocated. Long-lived processes with many write-once keys can run
//! [`spawn_sweeper`] to call [`ExpiringCache::purge_expired`] on a fixed period.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use logscope_core::{CacheError, Clock, Result};

use crate::cache::ExpiringCache;

/// Handle to a running sweeper task.
///
/// Dropping the handle stops the task; [`shutdown`](Self::shutdown) also waits for it to exit.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signals the task to stop and waits until it has exited.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Returns true while the task has not exited.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Spawns a Tokio task that purges expired entries from `cache` every `interval`.
///
/// Returns `CacheError::InvalidSweepInterval` for a zero interval and
/// `CacheError::NoRuntime` when called outside a Tokio runtime.
pub fn spawn_sweeper<T, C>(cache: Arc<ExpiringCache<T, C>>, interval: Duration) -> Result<SweeperHandle>
where
    T: Send + Sync + 'static,
    C: Clock + 'static,
{
    if interval.is_zero() {
        return Err(CacheError::InvalidSweepInterval);
    }
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = runtime.spawn(sweep_loop(cache, interval, shutdown_rx));
    debug!(?interval, "cache sweeper started");

    Ok(SweeperHandle {
        shutdown_tx,
        task: Some(task),
    })
}

async fn sweep_loop<T, C>(
    cache: Arc<ExpiringCache<T, C>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    T: Send + Sync + 'static,
    C: Clock + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                cache.purge_expired();
            }
        }
    }

    debug!("cache sweeper stopped");
}
