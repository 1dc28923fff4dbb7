//! Integration tests for the pack and cache endpoints.

mod common;

use std::sync::Arc;

use adventure_pack_core::{
    domain::{GeneratedAdventurePack, GenerationConstraints, WizardInput},
    ports::{AdventureTextService, ImageCacheStore, PortError, PortResult},
    CacheEntry, InMemoryImageCache,
};
use api_lib::adapters::DemoTextAdapter;
use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{Duration, Utc};

struct BrokenTextService;

#[async_trait]
impl AdventureTextService for BrokenTextService {
    async fn generate_pack(
        &self,
        _input: &WizardInput,
        _locale: &str,
        _constraints: GenerationConstraints,
    ) -> PortResult<GeneratedAdventurePack> {
        Err(PortError::Unexpected("rate limited".to_string()))
    }
}

#[tokio::test]
async fn health_returns_ok() {
    let app = common::build_demo_app(None);

    let (status, json) = common::send(app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn generate_returns_pack_with_searched_image() {
    let cache: Arc<dyn ImageCacheStore> = Arc::new(InMemoryImageCache::new());
    let app = common::build_demo_app(Some(cache.clone()));

    let (status, json) =
        common::send(app, "POST", "/packs/generate", Some(&common::wizard_json())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert!(json.get("warnings").is_none());
    let url = json["pack"]["image"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://picsum.photos/seed/"));
    let query = json["pack"]["image"]["prompt"].as_str().unwrap();
    assert!(cache.get(query).await.is_some());
    assert_eq!(json["pack"]["missions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn generate_without_image_providers_uses_placeholder() {
    let app = common::build_app(Arc::new(DemoTextAdapter), None, None, None);

    let (status, json) =
        common::send(app, "POST", "/packs/generate", Some(&common::wizard_json())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["pack"]["image"]["url"]
        .as_str()
        .unwrap()
        .contains("placehold.co"));
    let warnings = json["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap().contains("No se pudo obtener imagen")));
}

#[tokio::test]
async fn generate_reports_text_failure_as_bad_gateway() {
    let app = common::build_app(Arc::new(BrokenTextService), None, None, None);

    let (status, json) =
        common::send(app, "POST", "/packs/generate", Some(&common::wizard_json())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["ok"], false);
    assert!(json.get("pack").is_none());
    assert!(json["error"].as_str().unwrap().contains("rate limited"));
}

#[tokio::test]
async fn generate_rejects_malformed_input() {
    let app = common::build_demo_app(None);
    let mut body = common::wizard_json();
    body["place"] = serde_json::json!("volcano");

    let (status, _) = common::send(app, "POST", "/packs/generate", Some(&body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn reorder_missions_round_trips_the_pack() {
    let app = common::build_demo_app(None);
    let (_, generated) =
        common::send(app.clone(), "POST", "/packs/generate", Some(&common::wizard_json())).await;
    let first_title = generated["pack"]["missions"][0]["title"].clone();

    let body = serde_json::json!({ "pack": generated["pack"].clone(), "order": [2, 3, 1] });
    let (status, json) = common::send(app, "POST", "/packs/reorder-missions", Some(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["missions"][2]["title"], first_title);
    assert_eq!(json["missions"][2]["order"], 3);
}

#[tokio::test]
async fn reorder_missions_rejects_non_permutation() {
    let app = common::build_demo_app(None);
    let (_, generated) =
        common::send(app.clone(), "POST", "/packs/generate", Some(&common::wizard_json())).await;

    let body = serde_json::json!({ "pack": generated["pack"].clone(), "order": [1, 1, 2] });
    let (status, _) = common::send(app, "POST", "/packs/reorder-missions", Some(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expire_removes_stale_entries() {
    let cache = Arc::new(InMemoryImageCache::new());
    cache
        .set(CacheEntry {
            query: "stale".to_string(),
            url: "https://a.example/stale.jpg".to_string(),
            photographer: None,
            source_url: None,
            created_at: Utc::now() - Duration::hours(30),
        })
        .await;
    let shared: Arc<dyn ImageCacheStore> = cache.clone();
    let app = common::build_demo_app(Some(shared));

    let (status, json) = common::send(app, "POST", "/cache/expire", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn expire_honours_ttl_parameter() {
    let cache = Arc::new(InMemoryImageCache::new());
    cache
        .set(CacheEntry {
            query: "recent".to_string(),
            url: "https://a.example/recent.jpg".to_string(),
            photographer: None,
            source_url: None,
            created_at: Utc::now() - Duration::hours(3),
        })
        .await;
    let shared: Arc<dyn ImageCacheStore> = cache.clone();
    let app = common::build_demo_app(Some(shared));

    let (status, json) = common::send(app, "POST", "/cache/expire?ttlHours=1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);
}

#[tokio::test]
async fn expire_without_cache_is_not_found() {
    let app = common::build_demo_app(None);

    let (status, _) = common::send(app, "POST", "/cache/expire", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expire_with_out_of_range_ttl_is_rejected_and_cache_survives() {
    let cache = Arc::new(InMemoryImageCache::new());
    cache
        .set(CacheEntry {
            query: "fresh".to_string(),
            url: "https://a.example/fresh.jpg".to_string(),
            photographer: None,
            source_url: None,
            created_at: Utc::now(),
        })
        .await;
    let shared: Arc<dyn ImageCacheStore> = cache.clone();
    let app = common::build_demo_app(Some(shared));

    let uri = format!("/cache/expire?ttlHours={}", u32::MAX);
    let (status, _) = common::send(app.clone(), "POST", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(cache.get("fresh").await.is_some());
    let (status, json) = common::send(app, "POST", "/cache/expire", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 0);
}
