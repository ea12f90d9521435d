//! # Repository Module
//!
//! Persistence interfaces consulted on cache misses.

pub mod traits;

use thiserror::Error;

pub use traits::{
    CardDetailRepository, CardRepository, GradeChallengeRepository, LiveGrandPrixRepository,
    SongRepository,
};

/// Persistence failure surfaced by a repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
