use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::CacheConfig;
use crate::metrics::CacheMetrics;
use crate::template::MemoryCacheStore;

/// Background task removing expired compiled templates from the memory store
pub struct CacheCleanupTask {
    interval: Duration,
    store: Arc<MemoryCacheStore>,
    shutdown: broadcast::Receiver<()>,
}

impl CacheCleanupTask {
    pub fn new(
        config: &CacheConfig,
        store: Arc<MemoryCacheStore>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            interval: Duration::from_secs(config.cleanup_interval_seconds),
            store,
            shutdown,
        }
    }

    /// Run until a shutdown signal arrives
    pub async fn run(mut self) {
        let mut cleanup_timer = tokio::time::interval(self.interval);

        // Skip immediate first tick
        cleanup_timer.tick().await;

        tracing::info!(
            cleanup_interval_secs = self.interval.as_secs(),
            "Cache cleanup task started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("Cache cleanup task received shutdown signal");
                    break;
                }
                _ = cleanup_timer.tick() => {
                    self.cleanup();
                }
            }
        }

        tracing::info!("Cache cleanup task stopped");
    }

    fn cleanup(&self) {
        let purged = self.store.purge_expired();
        CacheMetrics::record_purge(purged, self.store.len());
    }
}
