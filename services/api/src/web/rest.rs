//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use adventure_pack_core::{
    domain::{reorder_missions, GeneratedAdventurePack, GenerationResult, WizardInput},
    ports::PortError,
    DEFAULT_CACHE_TTL_HOURS,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_pack_handler,
        reorder_missions_handler,
        expire_cache_handler,
        health_handler,
    ),
    components(
        schemas(ExpireCacheResponse, HealthResponse)
    ),
    tags(
        (name = "Adventure Pack API", description = "Generates themed, screen-free adventure packs with a cover image.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Payload for reordering the missions of a generated pack.
#[derive(Deserialize)]
pub struct ReorderMissionsRequest {
    pub pack: GeneratedAdventurePack,
    pub order: Vec<u32>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpireCacheParams {
    /// Age in hours after which entries are removed. Defaults to 24.
    pub ttl_hours: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct ExpireCacheResponse {
    removed: u64,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate an adventure pack from the wizard answers.
///
/// Always answers with a `GenerationResult`. Image problems never fail the
/// request; they are listed in `warnings`.
#[utoipa::path(
    post,
    path = "/packs/generate",
    request_body(content_type = "application/json", description = "The wizard answers."),
    responses(
        (status = 200, description = "Pack generated; `warnings` lists any degradation"),
        (status = 422, description = "Malformed wizard answers"),
        (status = 502, description = "The narrative could not be generated; `error` explains why")
    )
)]
pub async fn generate_pack_handler(
    State(app_state): State<Arc<AppState>>,
    Json(input): Json<WizardInput>,
) -> impl IntoResponse {
    let result: GenerationResult = app_state.orchestrator.generate(&input).await;
    let status = if result.ok {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(result))
}

/// Reorder the missions of a pack.
///
/// `order` lists the current mission numbers in their new sequence; missions
/// are renumbered from 1 afterwards.
#[utoipa::path(
    post,
    path = "/packs/reorder-missions",
    request_body(content_type = "application/json", description = "The pack and the new mission order."),
    responses(
        (status = 200, description = "The reordered pack"),
        (status = 400, description = "`order` is not a permutation of the mission numbers")
    )
)]
pub async fn reorder_missions_handler(
    Json(request): Json<ReorderMissionsRequest>,
) -> Result<Json<GeneratedAdventurePack>, (StatusCode, String)> {
    let ReorderMissionsRequest { mut pack, order } = request;
    reorder_missions(&mut pack, &order).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(pack))
}

/// Remove stale entries from the image cache.
#[utoipa::path(
    post,
    path = "/cache/expire",
    params(ExpireCacheParams),
    responses(
        (status = 200, description = "Stale entries removed", body = ExpireCacheResponse),
        (status = 400, description = "`ttlHours` is out of range"),
        (status = 404, description = "No image cache is configured"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn expire_cache_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ExpireCacheParams>,
) -> Result<Json<ExpireCacheResponse>, (StatusCode, String)> {
    let cache = app_state.cache.as_ref().ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            "No image cache is configured".to_string(),
        )
    })?;

    let ttl_hours = params.ttl_hours.unwrap_or(DEFAULT_CACHE_TTL_HOURS);
    match cache.expire(ttl_hours).await {
        Ok(removed) => {
            info!(removed, ttl_hours, "Image cache expired on request.");
            Ok(Json(ExpireCacheResponse { removed }))
        }
        Err(PortError::Validation(message)) => Err((StatusCode::BAD_REQUEST, message)),
        Err(e) => {
            error!("Failed to expire image cache: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to expire image cache".to_string(),
            ))
        }
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
