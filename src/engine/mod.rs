//! Content-similarity engine.
//!
//! The engine starts `Unbuilt`. The first recommendation request (or an explicit
//! [`Engine::warm_up`]) composes one document per catalog item, fits the TF-IDF
//! vector space and materializes the pairwise similarity matrix, then publishes
//! the result once. From then on the engine is `Ready` and the index is only
//! read. A failed build publishes nothing, so the engine stays `Unbuilt`.

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{CatalogItem, RecommendOutcome, Recommendations, ResolvedTitle};

pub mod document;
pub mod recommender;
pub mod resolver;
pub mod similarity;
pub mod vectorizer;

use similarity::SimilarityMatrix;
use vectorizer::VectorSpace;

/// Error types for the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("catalog item {index} ({title:?}) is missing required field `{field}`")]
    MissingField {
        index: usize,
        title: String,
        field: &'static str,
    },
    #[error("cannot build a vector space from an empty catalog")]
    EmptyCorpus,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid token pattern: {0}")]
    Tokenizer(String),
}

/// Tunables injected by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum fuzzy ratio for a title to match a query
    pub match_cutoff: f64,
    /// Overview length cap for recommendation entries
    pub overview_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_cutoff: resolver::DEFAULT_MATCH_CUTOFF,
            overview_max_chars: recommender::DEFAULT_OVERVIEW_MAX_CHARS,
        }
    }
}

/// The built artifacts: fitted vector space and similarity matrix
#[derive(Debug)]
pub struct SimilarityIndex {
    vector_space: VectorSpace,
    matrix: SimilarityMatrix,
    built_at: DateTime<Utc>,
}

impl SimilarityIndex {
    /// Composes documents, fits the vector space and computes all pairwise similarities
    pub fn build(catalog: &[CatalogItem]) -> Result<Self, EngineError> {
        let documents = document::compose_documents(catalog)?;
        let vector_space = VectorSpace::fit_transform(&documents)?;
        let matrix = SimilarityMatrix::from_vectors(vector_space.vectors());

        Ok(Self {
            vector_space,
            matrix,
            built_at: Utc::now(),
        })
    }

    pub fn vector_space(&self) -> &VectorSpace {
        &self.vector_space
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Unbuilt,
    Ready,
}

/// Snapshot of the engine for diagnostics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EngineStats {
    pub state: EngineState,
    pub item_count: usize,
    pub vocabulary_size: Option<usize>,
    pub built_at: Option<DateTime<Utc>>,
}

/// Recommendation engine over a static, in-memory catalog
pub struct Engine {
    catalog: Vec<CatalogItem>,
    titles: Vec<String>,
    config: EngineConfig,
    index: OnceLock<SimilarityIndex>,
    build_lock: Mutex<()>,
}

impl Engine {
    /// Creates an unbuilt engine. Item ids are reassigned to catalog positions.
    pub fn new(mut catalog: Vec<CatalogItem>, config: EngineConfig) -> Self {
        for (position, item) in catalog.iter_mut().enumerate() {
            item.id = position;
        }
        let titles = catalog.iter().map(|item| item.title.clone()).collect();

        Self {
            catalog,
            titles,
            config,
            index: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        if self.index.get().is_some() {
            EngineState::Ready
        } else {
            EngineState::Unbuilt
        }
    }

    /// Builds the index if needed and returns it.
    ///
    /// Concurrent callers wait for a single build. Errors leave the engine
    /// `Unbuilt`; a later call tries again.
    pub fn warm_up(&self) -> Result<&SimilarityIndex, EngineError> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }

        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = self.index.get() {
            return Ok(index);
        }

        tracing::info!(item_count = self.catalog.len(), "Building similarity index");
        let start = Instant::now();

        let index = SimilarityIndex::build(&self.catalog).map_err(|e| {
            tracing::warn!(error = %e, "Similarity index build failed");
            e
        })?;

        tracing::info!(
            item_count = self.catalog.len(),
            vocabulary_size = index.vector_space.vocabulary_size(),
            elapsed_ms = start.elapsed().as_millis(),
            "Similarity index ready"
        );

        Ok(self.index.get_or_init(|| index))
    }

    /// Resolves a free-text query to the closest catalog title, if any clears the cutoff
    pub fn resolve_title(&self, query: &str) -> Option<ResolvedTitle> {
        let resolved = resolver::resolve(query, &self.titles, self.config.match_cutoff);
        if resolved.is_none() {
            tracing::debug!(query = %query, "No close title match");
        }
        resolved
    }

    /// Catalog titles containing `query`, for incremental search
    pub fn suggest_titles(&self, query: &str, limit: usize) -> Vec<String> {
        resolver::suggest(query, &self.titles, limit)
    }

    /// Resolves `query` and returns the `top_n` most similar other movies
    pub fn recommend(&self, query: &str, top_n: usize) -> Result<RecommendOutcome, EngineError> {
        if top_n == 0 {
            return Err(EngineError::InvalidRequest(
                "top_n must be greater than zero".to_string(),
            ));
        }

        let Some(resolved) = self.resolve_title(query) else {
            return Ok(RecommendOutcome::NoMatch {
                query: query.to_string(),
            });
        };

        self.recommend_by_index(resolved.index, top_n)
            .map(RecommendOutcome::Found)
    }

    /// Returns the `top_n` movies most similar to the catalog item at `index`
    pub fn recommend_by_index(
        &self,
        index: usize,
        top_n: usize,
    ) -> Result<Recommendations, EngineError> {
        let item = self.catalog.get(index).ok_or_else(|| {
            EngineError::InvalidRequest(format!(
                "item index {} is out of range for a catalog of {} items",
                index,
                self.catalog.len()
            ))
        })?;

        let built = self.warm_up()?;
        let entries = recommender::recommend_for_index(
            &self.catalog,
            &built.matrix,
            index,
            top_n,
            self.config.overview_max_chars,
        )?;

        Ok(Recommendations {
            matched_index: index,
            matched_title: item.title.clone(),
            entries,
        })
    }

    pub fn stats(&self) -> EngineStats {
        let built = self.index.get();
        EngineStats {
            state: self.state(),
            item_count: self.catalog.len(),
            vocabulary_size: built.map(|index| index.vector_space.vocabulary_size()),
            built_at: built.map(|index| index.built_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn movie(title: &str, genre: &str, overview: &str, director: &str) -> CatalogItem {
        CatalogItem::new(title)
            .with_genre(genre)
            .with_overview(overview)
            .with_director(director)
            .with_cast(&["Lead Actor", "Second Lead", "Support One", "Support Two"])
            .with_rating(7.5)
            .with_released_year(2001)
    }

    fn alpha_beta_gamma() -> Vec<CatalogItem> {
        vec![
            movie("Alpha", "Drama", "A family drama set in a small town.", "Jane Doe"),
            movie("Beta", "Drama", "A family drama set in a small town.", "Jane Doe"),
            CatalogItem::new("Gamma")
                .with_genre("Comedy")
                .with_overview("Robots go on a wacky road trip.")
                .with_director("John Roe")
                .with_cast(&["Clown One", "Clown Two", "Clown Three", "Clown Four"])
                .with_rating(6.1)
                .with_released_year(2015),
        ]
    }

    fn engine(catalog: Vec<CatalogItem>) -> Engine {
        Engine::new(catalog, EngineConfig::default())
    }

    #[test]
    fn test_starts_unbuilt_and_warms_up_once() {
        let engine = engine(alpha_beta_gamma());
        assert_eq!(engine.state(), EngineState::Unbuilt);
        assert_eq!(engine.stats().vocabulary_size, None);

        let first = engine.warm_up().unwrap() as *const SimilarityIndex;
        assert_eq!(engine.state(), EngineState::Ready);
        let second = engine.warm_up().unwrap() as *const SimilarityIndex;
        assert_eq!(first, second);

        let stats = engine.stats();
        assert_eq!(stats.item_count, 3);
        assert!(stats.vocabulary_size.unwrap() > 0);
        assert!(stats.built_at.is_some());
    }

    #[test]
    fn test_ids_follow_catalog_position() {
        let engine = engine(alpha_beta_gamma());
        let ids: Vec<usize> = engine.catalog().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_first_recommendation_builds_index() {
        let engine = engine(alpha_beta_gamma());
        engine.recommend("alph", 1).unwrap();
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn test_alpha_scenario() {
        let engine = engine(alpha_beta_gamma());

        let resolved = engine.resolve_title("alph").unwrap();
        assert_eq!(resolved.title, "Alpha");

        let recommendations = engine.recommend("alph", 2).unwrap().found().unwrap();
        assert_eq!(recommendations.matched_title, "Alpha");
        assert_eq!(recommendations.matched_index, 0);
        let titles: Vec<&str> = recommendations
            .entries
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Beta", "Gamma"]);
        assert!(recommendations.entries[0].score > recommendations.entries[1].score);
    }

    #[test]
    fn test_unmatched_query_is_an_outcome() {
        let engine = engine(alpha_beta_gamma());
        assert_eq!(engine.resolve_title("xqzjvwk"), None);
        assert_eq!(
            engine.recommend("xqzjvwk", 5).unwrap(),
            RecommendOutcome::NoMatch {
                query: "xqzjvwk".to_string()
            }
        );
        // Resolution alone never builds the index
        assert_eq!(engine.state(), EngineState::Unbuilt);
    }

    #[test]
    fn test_zero_top_n_is_invalid() {
        let engine = engine(alpha_beta_gamma());
        assert!(matches!(
            engine.recommend("Alpha", 0),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_out_of_range_index_is_invalid() {
        let engine = engine(alpha_beta_gamma());
        assert!(matches!(
            engine.recommend_by_index(3, 1),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_single_item_catalog_recommends_nothing() {
        let engine = engine(vec![movie("Solo", "Drama", "Alone.", "Nobody")]);
        let recommendations = engine.recommend("Solo", 10).unwrap().found().unwrap();
        assert!(recommendations.entries.is_empty());
    }

    #[test]
    fn test_output_length_is_min_of_top_n_and_others() {
        let engine = engine(alpha_beta_gamma());
        for top_n in 1..=4 {
            let recommendations = engine.recommend_by_index(1, top_n).unwrap();
            assert_eq!(recommendations.entries.len(), top_n.min(2));
        }
    }

    #[test]
    fn test_duplicate_title_never_recommends_itself() {
        let mut catalog = alpha_beta_gamma();
        catalog.push(catalog[0].clone());
        let engine = engine(catalog);

        let recommendations = engine.recommend("Alpha", 3).unwrap().found().unwrap();
        assert_eq!(recommendations.matched_index, 0);
        assert!(recommendations.entries.iter().all(|e| e.index != 0));
        assert_eq!(recommendations.entries[0].index, 3);
        assert!((recommendations.entries[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_field_keeps_engine_unbuilt() {
        let mut catalog = alpha_beta_gamma();
        catalog[1].overview = None;
        let engine = engine(catalog);

        let err = engine.recommend("Alpha", 2).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingField {
                index: 1,
                title: "Beta".to_string(),
                field: "overview",
            }
        );
        assert_eq!(engine.state(), EngineState::Unbuilt);
        assert!(engine.warm_up().is_err());
    }

    #[test]
    fn test_empty_catalog_fails_build() {
        let engine = engine(Vec::new());
        assert_eq!(engine.warm_up().unwrap_err(), EngineError::EmptyCorpus);
        assert_eq!(engine.state(), EngineState::Unbuilt);
        assert_eq!(
            engine.recommend("anything", 1).unwrap(),
            RecommendOutcome::NoMatch {
                query: "anything".to_string()
            }
        );
    }

    #[test]
    fn test_concurrent_readers_share_one_index() {
        let engine = Arc::new(engine(alpha_beta_gamma()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let built = engine.warm_up().unwrap();
                    (built as *const SimilarityIndex as usize, built.matrix().len())
                })
            })
            .collect();

        let results: Vec<(usize, usize)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.iter().all(|(addr, len)| *addr == results[0].0 && *len == 3));
    }

    #[test]
    fn test_custom_cutoff_is_honoured() {
        let config = EngineConfig {
            match_cutoff: 0.95,
            ..EngineConfig::default()
        };
        let engine = Engine::new(alpha_beta_gamma(), config);
        assert_eq!(engine.resolve_title("alph"), None);
        assert!(engine.resolve_title("Alpha").is_some());
    }
}
