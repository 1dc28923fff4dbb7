//! crates/adventure_pack_core/src/ports.rs
//!
//! Defines the service contracts (traits) the orchestrator consumes.
//! These traits form the boundary of the hexagonal architecture: every remote
//! provider and the image cache are injected through them, so live and demo
//! implementations are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CacheEntry, GeneratedAdventurePack, GenerationConstraints, ImageSearchResult, PackImage,
    WizardInput,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid input: {0}")]
    Validation(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Provider Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AdventureTextService: Send + Sync {
    /// Produces the narrative pack and a provisional image prompt.
    /// Implementations must return a pack whose `image.prompt` is non-empty.
    async fn generate_pack(
        &self,
        input: &WizardInput,
        locale: &str,
        constraints: GenerationConstraints,
    ) -> PortResult<GeneratedAdventurePack>;
}

#[async_trait]
pub trait ImageSearchService: Send + Sync {
    /// Looks up a stock photograph. `Ok(None)` means "no results" and is not an error;
    /// `Err` is reserved for transport and auth failures.
    async fn search(&self, query: &str) -> PortResult<Option<ImageSearchResult>>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> PortResult<PackImage>;
}

/// Key-value store of prior search results, keyed by query.
///
/// `get` and `set` never fail from the caller's point of view: a cache is an
/// optimization, so implementations log their own faults and degrade to a
/// miss or a dropped write. Writes are idempotent upserts, which is why
/// concurrent writers for the same query need no locking.
#[async_trait]
pub trait ImageCacheStore: Send + Sync {
    /// Returns a fresh entry for `query`, or `None` on miss, staleness or fault.
    async fn get(&self, query: &str) -> Option<CacheEntry>;

    /// Inserts or replaces the entry for `entry.query`.
    async fn set(&self, entry: CacheEntry);

    /// Deletes entries older than `ttl_hours` and returns how many were removed.
    async fn expire(&self, ttl_hours: u32) -> PortResult<u64>;
}

//=========================================================================================
// Clock
//=========================================================================================

/// Abstraction over system time so cache freshness is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
