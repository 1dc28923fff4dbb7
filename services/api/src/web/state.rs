//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and builds it from configuration,
//! choosing the live or demo implementation for every provider role.

use crate::{
    adapters::{
        DemoImageAdapter, DemoSearchAdapter, DemoTextAdapter, OpenAiImageAdapter,
        OpenAiTextAdapter, PgImageCache, UnsplashSearchAdapter,
    },
    config::{CacheBackend, Config, ImageProviderKind, SearchProviderKind, TextProviderKind},
    error::ApiError,
};
use adventure_pack_core::{
    ports::{AdventureTextService, ImageCacheStore, ImageGenerationService, ImageSearchService},
    InMemoryImageCache, MultimodalOrchestrator,
};
use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: MultimodalOrchestrator,
    /// Kept separately so the maintenance endpoint can reach it.
    pub cache: Option<Arc<dyn ImageCacheStore>>,
}

impl AppState {
    /// Wires the orchestrator from the configured provider implementations.
    pub async fn from_config(config: Arc<Config>) -> Result<Self, ApiError> {
        let http = reqwest::Client::new();
        let openai_client = || {
            config
                .openai_api_key
                .clone()
                .map(|key| Client::with_config(OpenAIConfig::new().with_api_key(key)))
                .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))
        };

        let text: Arc<dyn AdventureTextService> = match config.text_provider {
            TextProviderKind::OpenAi => Arc::new(OpenAiTextAdapter::new(
                openai_client()?,
                config.text_model.clone(),
            )),
            TextProviderKind::Demo => Arc::new(DemoTextAdapter),
        };

        let search: Option<Arc<dyn ImageSearchService>> = match config.search_provider {
            SearchProviderKind::Unsplash => {
                let key = config.unsplash_access_key.clone().ok_or_else(|| {
                    ApiError::Internal("UNSPLASH_ACCESS_KEY is required".to_string())
                })?;
                Some(Arc::new(UnsplashSearchAdapter::new(http, key)))
            }
            SearchProviderKind::Demo => Some(Arc::new(DemoSearchAdapter)),
            SearchProviderKind::Disabled => None,
        };

        let image_generation: Option<Arc<dyn ImageGenerationService>> =
            match config.image_provider {
                ImageProviderKind::OpenAi => Some(Arc::new(OpenAiImageAdapter::new(
                    openai_client()?,
                    config.image_model.clone(),
                ))),
                ImageProviderKind::Demo => Some(Arc::new(DemoImageAdapter)),
                ImageProviderKind::Disabled => None,
            };

        let cache: Option<Arc<dyn ImageCacheStore>> = match config.cache_backend {
            CacheBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_ref()
                    .ok_or_else(|| ApiError::Internal("DATABASE_URL is required".to_string()))?;
                info!("Connecting to database...");
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await?;
                let pg_cache = PgImageCache::new(pool);
                info!("Running database migrations...");
                pg_cache.run_migrations().await?;
                info!("Database migrations complete.");
                Some(Arc::new(pg_cache))
            }
            CacheBackend::Memory => Some(Arc::new(InMemoryImageCache::new())),
            CacheBackend::Disabled => None,
        };

        info!(
            text = ?config.text_provider,
            search = ?config.search_provider,
            image = ?config.image_provider,
            cache = ?config.cache_backend,
            "Providers selected."
        );

        Ok(Self::new(config, text, search, cache, image_generation))
    }

    /// Builds the state from already-constructed collaborators.
    pub fn new(
        config: Arc<Config>,
        text: Arc<dyn AdventureTextService>,
        search: Option<Arc<dyn ImageSearchService>>,
        cache: Option<Arc<dyn ImageCacheStore>>,
        image_generation: Option<Arc<dyn ImageGenerationService>>,
    ) -> Self {
        let mut orchestrator = MultimodalOrchestrator::new(text).with_locale(config.locale.clone());
        if let Some(search) = search {
            orchestrator = orchestrator.with_search(search);
        }
        if let Some(cache) = &cache {
            orchestrator = orchestrator.with_cache(cache.clone());
        }
        if let Some(generator) = image_generation {
            orchestrator = orchestrator.with_image_generation(generator);
        }
        Self {
            config,
            orchestrator,
            cache,
        }
    }
}
