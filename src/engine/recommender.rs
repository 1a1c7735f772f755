use crate::models::{CatalogItem, RecommendationEntry};

use super::similarity::SimilarityMatrix;
use super::EngineError;

/// Default overview length shown with each recommendation
pub const DEFAULT_OVERVIEW_MAX_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Cuts `text` to at most `max_chars` characters, appending "..." only when cut
pub fn truncate_overview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Orders every candidate except `exclude` by descending score.
///
/// Equal scores keep ascending candidate index.
pub fn rank_candidates(row: &[f64], exclude: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(candidate, _)| *candidate != exclude)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// Top `top_n` items most similar to the item at `index`.
///
/// The item itself is excluded by position, so a duplicate with an identical
/// document still shows up as a recommendation. Returns `min(top_n, N - 1)`
/// entries.
pub fn recommend_for_index(
    catalog: &[CatalogItem],
    matrix: &SimilarityMatrix,
    index: usize,
    top_n: usize,
    overview_max_chars: usize,
) -> Result<Vec<RecommendationEntry>, EngineError> {
    if top_n == 0 {
        return Err(EngineError::InvalidRequest(
            "top_n must be greater than zero".to_string(),
        ));
    }

    let row = matrix.row(index).ok_or_else(|| {
        EngineError::InvalidRequest(format!(
            "item index {} is out of range for a catalog of {} items",
            index,
            matrix.len()
        ))
    })?;

    let entries = rank_candidates(row, index)
        .into_iter()
        .take(top_n)
        .filter_map(|(candidate, score)| {
            catalog
                .get(candidate)
                .map(|item| to_entry(candidate, item, score, overview_max_chars))
        })
        .collect();

    Ok(entries)
}

fn to_entry(
    index: usize,
    item: &CatalogItem,
    score: f64,
    overview_max_chars: usize,
) -> RecommendationEntry {
    RecommendationEntry {
        index,
        title: item.title.clone(),
        score,
        year: item.released_year,
        genre: item.genre.clone().unwrap_or_default(),
        rating: item.rating,
        director: item.director.clone().unwrap_or_default(),
        overview: truncate_overview(
            item.overview.as_deref().unwrap_or_default(),
            overview_max_chars,
        ),
    }
}
