//! Background task that drops idle intake sessions.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;

use crate::ports::{SessionStore, SessionStoreError};

/// Timing for the eviction sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Sessions untouched for this long are dropped.
    pub idle_timeout: Duration,
    /// Delay between sweeps.
    pub interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(1800),
            interval: Duration::from_secs(60),
        }
    }
}

/// Periodically evicts idle sessions from a store.
pub struct EvictionSweeper {
    store: Arc<dyn SessionStore>,
    config: SweeperConfig,
}

impl EvictionSweeper {
    pub fn new(store: Arc<dyn SessionStore>, config: SweeperConfig) -> Self {
        Self { store, config }
    }

    /// Runs until the shutdown channel flips to `true`.
    ///
    /// A failed sweep is logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("Eviction sweeper stopping");
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        tracing::warn!(error = %e, "Session sweep failed");
                    }
                }
            }
        }
    }

    /// Runs a single sweep and returns how many sessions were dropped.
    pub async fn sweep_once(&self) -> Result<usize, SessionStoreError> {
        let evicted = self.store.evict_idle(self.config.idle_timeout).await?;
        if evicted > 0 {
            let remaining = self.store.len().await;
            tracing::info!(evicted, remaining, "Evicted idle sessions");
        }
        Ok(evicted)
    }
}

/// Spawns the sweeper on the current runtime.
pub fn spawn_eviction_sweeper(
    store: Arc<dyn SessionStore>,
    config: SweeperConfig,
    shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    let sweeper = EvictionSweeper::new(store, config);
    tokio::spawn(async move { sweeper.run(shutdown).await })
}
