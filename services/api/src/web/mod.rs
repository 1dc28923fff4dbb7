pub mod maintenance;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{
    expire_cache_handler, generate_pack_handler, health_handler, reorder_missions_handler,
};
pub use state::AppState;

/// Builds the API router shared by the server binary and the HTTP tests.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/packs/generate", post(generate_pack_handler))
        .route("/packs/reorder-missions", post(reorder_missions_handler))
        .route("/cache/expire", post(expire_cache_handler))
        .with_state(app_state)
}
