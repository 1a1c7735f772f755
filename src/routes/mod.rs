use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    engine::Engine,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
};

pub mod index;
pub mod recommendations;
pub mod titles;

/// Shared application state
///
/// Handlers are stateless per call; anything the presentation layer wants to
/// remember between requests lives on its side.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(engine: Engine, config: Config) -> Self {
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/titles/resolve", get(titles::resolve))
        .route("/titles/suggest", get(titles::suggest))
        .route("/recommendations", get(recommendations::recommend))
        .route("/engine/stats", get(index::stats))
        .route("/engine/warm-up", post(index::warm_up))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
