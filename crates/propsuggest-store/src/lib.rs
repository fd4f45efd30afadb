//! Pairwise co-occurrence statistics store.
//!
//! The suggestion engine only ever reads aggregate sums from a store; how the
//! statistics are kept is hidden behind the [`StatisticsStore`] trait.
//!
//! # Architecture
//!
//! - [`memory`] -- In-memory store indexed by context and first attribute
//! - [`table`] -- Loader for tab-separated dumps of the pair table
//! - [`snapshot`] -- Atomically replaceable store for live refreshes
//! - [`timeout`] -- Wrapper turning slow lookups into a transient error

pub mod memory;
pub mod snapshot;
pub mod table;
pub mod timeout;

use std::sync::Arc;
use std::time::Duration;

use propsuggest_core::{AttributeId, AttributeSet, Context, ScoreSum};

pub use memory::InMemoryStore;
pub use snapshot::SnapshotStore;
pub use table::{LoadSummary, load_table, parse_table};
pub use timeout::{DEFAULT_MAX_IN_FLIGHT, TimeoutStore};

/// Runtime failure of an aggregate lookup.
///
/// Both variants are transient: the same query may succeed later. An empty
/// result is never reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("statistics store unavailable: {0}")]
    Unavailable(String),
    #[error("statistics store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Failure while building a store from raw pair data.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read pair table: {0}")]
    Io(#[from] std::io::Error),
    #[error("pair table has no header line")]
    MissingHeader,
    #[error("pair table header lacks required column {0:?}")]
    MissingColumn(&'static str),
    #[error("line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}: invalid {column} value {value:?}")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: empty context")]
    EmptyContext { line: usize },
    #[error("probability {probability} for ({first}, {second}) in {context:?} is outside [0, 1]")]
    ProbabilityOutOfRange {
        first: AttributeId,
        second: AttributeId,
        context: Context,
        probability: f64,
    },
    #[error("duplicate pair ({first}, {second}) in context {context:?}")]
    DuplicatePair {
        first: AttributeId,
        second: AttributeId,
        context: Context,
    },
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<TableError>,
    },
}

/// Read access to precomputed co-occurrence statistics.
///
/// Implementations must be safe to query from many threads at once and must
/// never expose their internal data mutably.
pub trait StatisticsStore: Send + Sync {
    /// Sum the probabilities linking every seed to each candidate attribute.
    ///
    /// For every attribute `b` outside `excluded` that has at least one
    /// statistic `(a, b, context)` with `a` in `seeds`, returns one
    /// [`ScoreSum`] holding `Σ probability(a, b, context)` over the seeds.
    /// Seeds without a statistic for `b` contribute nothing. The order of the
    /// returned entries is unspecified.
    fn aggregate_scores(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Result<Vec<ScoreSum>, StoreError>;
}

impl<S: StatisticsStore + ?Sized> StatisticsStore for &S {
    fn aggregate_scores(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Result<Vec<ScoreSum>, StoreError> {
        (**self).aggregate_scores(seeds, excluded, context)
    }
}

impl<S: StatisticsStore + ?Sized> StatisticsStore for Arc<S> {
    fn aggregate_scores(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Result<Vec<ScoreSum>, StoreError> {
        (**self).aggregate_scores(seeds, excluded, context)
    }
}

impl<S: StatisticsStore + ?Sized> StatisticsStore for Box<S> {
    fn aggregate_scores(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Result<Vec<ScoreSum>, StoreError> {
        (**self).aggregate_scores(seeds, excluded, context)
    }
}
