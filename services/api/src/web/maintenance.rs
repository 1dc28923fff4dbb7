//! services/api/src/web/maintenance.rs
//!
//! Background task that periodically evicts stale image cache entries.

use adventure_pack_core::{ports::ImageCacheStore, DEFAULT_CACHE_TTL_HOURS};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Spawns the cache expiry loop. It runs once per `every` until the token is
/// cancelled. Failures are logged and retried on the next tick.
pub fn spawn_cache_expiry(
    cache: Arc<dyn ImageCacheStore>,
    every: Duration,
    cancellation_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Cache expiry task started (every {:?}).", every);
        let mut interval = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    info!("Cache expiry task cancelled.");
                    return;
                }
                _ = interval.tick() => {
                    match cache.expire(DEFAULT_CACHE_TTL_HOURS).await {
                        Ok(0) => {}
                        Ok(removed) => info!(removed, "Expired stale image cache entries."),
                        Err(e) => error!("Failed to expire image cache: {:?}", e),
                    }
                }
            }
        }
    })
}
