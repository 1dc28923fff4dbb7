//! Shared helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use adventure_pack_core::ports::{
    AdventureTextService, ImageCacheStore, ImageGenerationService, ImageSearchService,
};
use api_lib::adapters::{DemoSearchAdapter, DemoTextAdapter};
use api_lib::config::{
    CacheBackend, Config, ImageProviderKind, SearchProviderKind, TextProviderKind,
};
use api_lib::web::{self, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub fn test_config() -> Arc<Config> {
    Arc::new(Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: None,
        log_level: tracing::Level::INFO,
        locale: "es-ES".to_string(),
        openai_api_key: None,
        unsplash_access_key: None,
        text_provider: TextProviderKind::Demo,
        search_provider: SearchProviderKind::Demo,
        image_provider: ImageProviderKind::Disabled,
        cache_backend: CacheBackend::Memory,
        text_model: "gpt-4o-mini".to_string(),
        image_model: "dall-e-3".to_string(),
        cache_expiry_interval_minutes: 60,
    })
}

/// Build the router from explicit collaborators.
pub fn build_app(
    text: Arc<dyn AdventureTextService>,
    search: Option<Arc<dyn ImageSearchService>>,
    cache: Option<Arc<dyn ImageCacheStore>>,
    image_generation: Option<Arc<dyn ImageGenerationService>>,
) -> Router {
    let state = AppState::new(test_config(), text, search, cache, image_generation);
    web::router(Arc::new(state))
}

/// Demo text and search with the given cache.
pub fn build_demo_app(cache: Option<Arc<dyn ImageCacheStore>>) -> Router {
    build_app(
        Arc::new(DemoTextAdapter),
        Some(Arc::new(DemoSearchAdapter)),
        cache,
        None,
    )
}

pub fn wizard_json() -> serde_json::Value {
    serde_json::json!({
        "occasion": "birthday",
        "ages": { "min": 6, "max": 10 },
        "kidsCount": 4,
        "place": "home",
        "adventureType": "adventure",
        "tone": "exciting",
        "difficulty": "medium"
    })
}

/// Send a request with an optional JSON body and return status and JSON body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
