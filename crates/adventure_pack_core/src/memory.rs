//! In-process implementation of the `ImageCacheStore` port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, warn};

use crate::domain::CacheEntry;
use crate::ports::{Clock, ImageCacheStore, PortError, PortResult, SystemClock};

/// Freshness window for cached search results.
pub const DEFAULT_CACHE_TTL_HOURS: u32 = 24;

/// A mutex-guarded map of search results. Freshness is checked on every read,
/// so `expire` only reclaims memory.
pub struct InMemoryImageCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl InMemoryImageCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl: Duration::hours(DEFAULT_CACHE_TTL_HOURS.into()),
        }
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryImageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageCacheStore for InMemoryImageCache {
    async fn get(&self, query: &str) -> Option<CacheEntry> {
        let entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "image cache lock poisoned; treating as miss");
                return None;
            }
        };
        let now = self.clock.now();
        entries
            .get(query)
            .filter(|entry| now - entry.created_at < self.ttl)
            .cloned()
    }

    async fn set(&self, entry: CacheEntry) {
        match self.entries.lock() {
            Ok(mut entries) => {
                debug!(query = %entry.query, "caching image search result");
                entries.insert(entry.query.clone(), entry);
            }
            Err(e) => warn!(error = %e, "image cache lock poisoned; dropping write"),
        }
    }

    async fn expire(&self, ttl_hours: u32) -> PortResult<u64> {
        let cutoff = Duration::try_hours(ttl_hours.into())
            .and_then(|ttl| self.clock.now().checked_sub_signed(ttl))
            .ok_or_else(|| {
                PortError::Validation(format!("ttl of {} hours is out of range", ttl_hours))
            })?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let before = entries.len();
        entries.retain(|_, entry| entry.created_at >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}
