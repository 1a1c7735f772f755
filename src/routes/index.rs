use axum::{extract::State, Json};

use crate::{
    engine::EngineStats,
    error::{AppError, AppResult},
};

use super::AppState;

/// Handler reporting whether the similarity index is built
pub async fn stats(State(state): State<AppState>) -> Json<EngineStats> {
    Json(state.engine.stats())
}

/// Handler that builds the similarity index ahead of the first recommendation
pub async fn warm_up(State(state): State<AppState>) -> AppResult<Json<EngineStats>> {
    let engine = state.engine.clone();
    let stats = tokio::task::spawn_blocking(move || engine.warm_up().map(|_| engine.stats()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(stats))
}
