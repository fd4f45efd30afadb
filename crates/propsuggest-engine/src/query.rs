// Suggestion query parameters

use propsuggest_core::{AttributeId, AttributeSet, Context};

use crate::InvalidQuery;

/// Default maximum number of suggestions.
pub const DEFAULT_LIMIT: usize = 7;

/// Default exclusive lower bound on the average score.
pub const DEFAULT_MIN_PROBABILITY: f64 = 0.05;

/// Everything about a query except the seed attributes.
///
/// Shared by the entry points that derive seeds from ids or entities.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Maximum number of suggestions returned. Must be at least 1.
    pub limit: usize,
    /// Exclusive lower bound on the average score, in `[0, 1)`.
    pub min_probability: f64,
    /// The statistics namespace to read.
    pub context: Context,
    /// Attributes never to suggest, on top of the seeds.
    pub excluded_attributes: AttributeSet,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            min_probability: DEFAULT_MIN_PROBABILITY,
            context: Context::item(),
            excluded_attributes: AttributeSet::new(),
        }
    }
}

impl QueryOptions {
    pub fn new(limit: usize, min_probability: f64, context: impl Into<Context>) -> Self {
        Self {
            limit,
            min_probability,
            context: context.into(),
            excluded_attributes: AttributeSet::new(),
        }
    }

    pub fn excluding<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AttributeId>,
    {
        self.excluded_attributes.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Check `limit` and `min_probability`.
    pub fn validate(&self) -> Result<(), InvalidQuery> {
        if self.limit == 0 {
            return Err(InvalidQuery::ZeroLimit);
        }
        // NaN fails the range check as well.
        if !(0.0..1.0).contains(&self.min_probability) {
            return Err(InvalidQuery::MinProbabilityOutOfRange(self.min_probability));
        }
        Ok(())
    }
}

/// One ranking request: seeds plus options.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionQuery {
    /// Attributes already known to apply. An empty set yields no suggestions.
    pub seed_attributes: AttributeSet,
    pub options: QueryOptions,
}

impl SuggestionQuery {
    /// A query with default options in the given context.
    pub fn new(seed_attributes: AttributeSet, context: impl Into<Context>) -> Self {
        Self {
            seed_attributes,
            options: QueryOptions {
                context: context.into(),
                ..QueryOptions::default()
            },
        }
    }

    pub fn with_options(seed_attributes: AttributeSet, options: QueryOptions) -> Self {
        Self {
            seed_attributes,
            options,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = limit;
        self
    }

    pub fn min_probability(mut self, min_probability: f64) -> Self {
        self.options.min_probability = min_probability;
        self
    }

    pub fn excluding<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AttributeId>,
    {
        self.options = self.options.excluding(ids);
        self
    }

    pub fn context(&self) -> &Context {
        &self.options.context
    }

    pub fn validate(&self) -> Result<(), InvalidQuery> {
        self.options.validate()
    }
}
