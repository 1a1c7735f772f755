use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    q: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub query: String,
    pub title: String,
    pub index: usize,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    q: String,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub query: String,
    pub suggestions: Vec<String>,
}

/// Handler for resolving a free-text query to a catalog title
pub async fn resolve(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<ResolveQuery>,
) -> AppResult<Json<ResolveResponse>> {
    let resolved = state.engine.resolve_title(&params.q).ok_or_else(|| {
        AppError::NotFound(format!("No close match found for '{}'", params.q))
    })?;

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        matched_title = %resolved.title,
        score = resolved.score,
        "Resolved title"
    );

    Ok(Json(ResolveResponse {
        query: params.q,
        title: resolved.title,
        index: resolved.index,
        score: resolved.score,
    }))
}

/// Handler for incremental-search suggestions
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestQuery>,
) -> Json<SuggestResponse> {
    let limit = params.limit.unwrap_or(state.config.suggestion_limit);
    let suggestions = state.engine.suggest_titles(&params.q, limit);

    Json(SuggestResponse {
        query: params.q,
        suggestions,
    })
}
