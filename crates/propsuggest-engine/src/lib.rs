//! Co-occurrence based property suggestion.
//!
//! Given the attributes already present on an entity, the engine ranks the
//! attributes most likely to co-occur with them, using pairwise statistics
//! read from a [`StatisticsStore`](propsuggest_store::StatisticsStore).
//!
//! # Architecture
//!
//! - [`query`] -- Query parameters and their validation
//! - [`ranking`] -- Averaging, thresholding, ordering and truncation
//! - [`source`] -- Input adapters projecting ids or entities to a seed set
//! - [`engine`] -- The engine tying store lookups and ranking together

pub mod engine;
pub mod query;
pub mod ranking;
pub mod source;

use propsuggest_store::StoreError;

pub use engine::{EngineOptions, SuggestionEngine};
pub use query::{DEFAULT_LIMIT, DEFAULT_MIN_PROBABILITY, QueryOptions, SuggestionQuery};
pub use ranking::Ranking;
pub use source::SeedSource;

/// Reasons a query is rejected before any lookup happens.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidQuery {
    #[error("limit must be at least 1")]
    ZeroLimit,
    #[error("minimum probability {0} is outside [0, 1)")]
    MinProbabilityOutOfRange(f64),
}

/// Error type for a single `suggest` call.
///
/// An empty result is not an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SuggestError {
    /// The query parameters are meaningless. Not worth retrying.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] InvalidQuery),

    /// The statistics store could not answer. The same query may succeed
    /// later.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl SuggestError {
    /// Whether the caller may retry the same query later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SuggestError::StoreUnavailable(_))
    }
}
