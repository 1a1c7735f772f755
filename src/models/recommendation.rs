use serde::Serialize;

/// A free-text query resolved to a canonical catalog title
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedTitle {
    /// Catalog position of the matched title (first occurrence for duplicates)
    pub index: usize,
    pub title: String,
    /// Fuzzy match ratio in [0, 1]
    pub score: f64,
}

/// One recommended movie with the metadata shown alongside it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationEntry {
    pub index: usize,
    pub title: String,
    /// Cosine similarity to the resolved movie, in [0, 1]
    pub score: f64,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: f64,
    pub director: String,
    /// Overview capped to the configured length, with "..." when cut
    pub overview: String,
}

/// Ranked recommendations for a resolved movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendations {
    pub matched_index: usize,
    pub matched_title: String,
    pub entries: Vec<RecommendationEntry>,
}

/// Outcome of a recommendation request
///
/// An unmatched query is an expected user-input outcome and is reported as a
/// value rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendOutcome {
    Found(Recommendations),
    NoMatch { query: String },
}

impl RecommendOutcome {
    pub fn found(self) -> Option<Recommendations> {
        match self {
            RecommendOutcome::Found(recommendations) => Some(recommendations),
            RecommendOutcome::NoMatch { .. } => None,
        }
    }
}
