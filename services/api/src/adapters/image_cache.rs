//! services/api/src/adapters/image_cache.rs
//!
//! This module contains the Postgres-backed image cache, the concrete
//! implementation of the `ImageCacheStore` port used in production. Reads
//! filter by freshness at query time; `expire` only reclaims space.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use adventure_pack_core::domain::CacheEntry;
use adventure_pack_core::ports::{ImageCacheStore, PortError, PortResult};
use adventure_pack_core::DEFAULT_CACHE_TTL_HOURS;
use sqlx::{FromRow, PgPool};
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A cache adapter that implements the `ImageCacheStore` port.
#[derive(Clone)]
pub struct PgImageCache {
    pool: PgPool,
    ttl_hours: u32,
}

impl PgImageCache {
    /// Creates a new `PgImageCache`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ttl_hours: DEFAULT_CACHE_TTL_HOURS,
        }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Converts a TTL to the `int` that `make_interval(hours => ..)` takes.
fn interval_hours(ttl_hours: u32) -> PortResult<i32> {
    i32::try_from(ttl_hours).map_err(|_| {
        PortError::Validation(format!("ttl of {} hours is out of range", ttl_hours))
    })
}

//=========================================================================================
// "Impure" Database Record Struct
//=========================================================================================

#[derive(FromRow)]
struct CacheRecord {
    query: String,
    url: String,
    photographer: Option<String>,
    source_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl CacheRecord {
    fn to_domain(self) -> CacheEntry {
        CacheEntry {
            query: self.query,
            url: self.url,
            photographer: self.photographer,
            source_url: self.source_url,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `ImageCacheStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageCacheStore for PgImageCache {
    async fn get(&self, query: &str) -> Option<CacheEntry> {
        let hours = match interval_hours(self.ttl_hours) {
            Ok(hours) => hours,
            Err(e) => {
                warn!(%query, error = %e, "image cache read skipped; treating as miss");
                return None;
            }
        };
        let result = sqlx::query_as::<_, CacheRecord>(
            "SELECT query, url, photographer, source_url, created_at FROM image_cache \
             WHERE query = $1 AND created_at > now() - make_interval(hours => $2)",
        )
        .bind(query)
        .bind(hours)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(record) => record.map(CacheRecord::to_domain),
            Err(e) => {
                warn!(%query, error = %e, "image cache read failed; treating as miss");
                None
            }
        }
    }

    async fn set(&self, entry: CacheEntry) {
        let result = sqlx::query(
            "INSERT INTO image_cache (query, url, photographer, source_url, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (query) DO UPDATE SET url = EXCLUDED.url, \
             photographer = EXCLUDED.photographer, source_url = EXCLUDED.source_url, \
             created_at = EXCLUDED.created_at",
        )
        .bind(&entry.query)
        .bind(&entry.url)
        .bind(&entry.photographer)
        .bind(&entry.source_url)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            warn!(query = %entry.query, error = %e, "image cache write failed; dropping entry");
        }
    }

    async fn expire(&self, ttl_hours: u32) -> PortResult<u64> {
        let hours = interval_hours(ttl_hours)?;
        let result = sqlx::query(
            "DELETE FROM image_cache WHERE created_at < now() - make_interval(hours => $1)",
        )
        .bind(hours)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
