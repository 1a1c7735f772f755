pub mod catalog;
pub mod recommendation;

pub use catalog::CatalogItem;
pub use recommendation::{RecommendOutcome, RecommendationEntry, Recommendations, ResolvedTitle};
