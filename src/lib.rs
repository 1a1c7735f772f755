//! MovieMate: content-based movie recommendations.
//!
//! Each movie's title, genre, overview, director and principal cast are joined
//! into one document. Documents are embedded in a TF-IDF vector space, compared
//! pairwise by cosine similarity, and queried through fuzzy title resolution.

pub mod config;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
