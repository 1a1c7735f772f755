use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    engine::EngineError,
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendOutcome, RecommendationEntry},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub q: String,
    pub top_n: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub matched_title: String,
    pub matched_index: usize,
    pub recommendations: Vec<RecommendationView>,
}

/// A recommendation as shown to the user
#[derive(Debug, Serialize)]
pub struct RecommendationView {
    pub title: String,
    pub score: f64,
    /// Score as a percentage rounded to one decimal
    pub match_percent: f64,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: f64,
    pub director: String,
    pub overview: String,
}

impl From<RecommendationEntry> for RecommendationView {
    fn from(entry: RecommendationEntry) -> Self {
        Self {
            match_percent: (entry.score * 1000.0).round() / 10.0,
            title: entry.title,
            score: entry.score,
            year: entry.year,
            genre: entry.genre,
            rating: entry.rating,
            director: entry.director,
            overview: entry.overview,
        }
    }
}

/// Converts the requested count, applying the configured default and ceiling.
///
/// Zero is passed through so the engine rejects it.
fn requested_top_n(requested: Option<i64>, default: usize, max: usize) -> AppResult<usize> {
    let Some(requested) = requested else {
        return Ok(default);
    };
    let top_n = usize::try_from(requested).map_err(|_| {
        EngineError::InvalidRequest(format!("top_n must be positive, got {}", requested))
    })?;
    if top_n > max {
        return Err(AppError::InvalidInput(format!(
            "top_n must be at most {}, got {}",
            max, top_n
        )));
    }
    Ok(top_n)
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let top_n = requested_top_n(
        params.top_n,
        state.config.default_top_n,
        state.config.max_top_n,
    )?;

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        top_n,
        "Processing recommendation request"
    );

    // The first request may have to build the index, which is CPU-bound
    let engine = state.engine.clone();
    let query = params.q.clone();
    let outcome = tokio::task::spawn_blocking(move || engine.recommend(&query, top_n))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let recommendations = match outcome {
        RecommendOutcome::Found(recommendations) => recommendations,
        RecommendOutcome::NoMatch { query } => {
            tracing::info!(request_id = %request_id, query = %query, "No close match");
            return Err(AppError::NotFound(format!(
                "No close match found for '{}'",
                query
            )));
        }
    };

    tracing::info!(
        request_id = %request_id,
        matched_title = %recommendations.matched_title,
        count = recommendations.entries.len(),
        "Recommendations ready"
    );

    Ok(Json(RecommendationResponse {
        query: params.q,
        matched_title: recommendations.matched_title,
        matched_index: recommendations.matched_index,
        recommendations: recommendations
            .entries
            .into_iter()
            .map(RecommendationView::from)
            .collect(),
    }))
}
