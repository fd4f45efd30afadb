// SuggestionEngine: top-level entry point for property suggestions.
//
// Owns the statistics store and the engine-wide configuration and turns a
// query into a ranked, bounded, thresholded list of suggestions.
//
// Design notes:
// - The engine holds no mutable state. `suggest` takes `&self`, so one
//   engine can serve concurrent callers when the store is `Send + Sync`.
// - Deprecated attributes are fixed at construction. Changing them means
//   building a new engine.
// - Exclusions go to the store and are checked again in `Ranking`.

use propsuggest_core::{AttributeId, AttributeSet, Context, Entity, Suggestion};
use propsuggest_store::StatisticsStore;
use tracing::{debug, warn};

use crate::SuggestError;
use crate::query::{QueryOptions, SuggestionQuery};
use crate::ranking::Ranking;
use crate::source::SeedSource;

/// Engine-wide configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Attributes never suggested, whatever the query says.
    pub deprecated_attributes: AttributeSet,
}

impl EngineOptions {
    pub fn with_deprecated<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AttributeId>,
    {
        Self {
            deprecated_attributes: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ranks additional attributes for an entity from pairwise co-occurrence
/// statistics.
pub struct SuggestionEngine<S> {
    store: S,
    options: EngineOptions,
}

impl<S: StatisticsStore> SuggestionEngine<S> {
    /// Create an engine with no deprecated attributes.
    pub fn new(store: S) -> Self {
        Self::with_options(store, EngineOptions::default())
    }

    pub fn with_options(store: S, options: EngineOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn deprecated_attributes(&self) -> &AttributeSet {
        &self.options.deprecated_attributes
    }

    /// Rank suggestions for a query.
    ///
    /// Steps: validate, short-circuit on an empty seed set, build the full
    /// exclusion set (query exclusions, seeds, deprecated attributes), fetch
    /// the raw probability sums, then average, threshold, sort and truncate.
    pub fn suggest(&self, query: &SuggestionQuery) -> Result<Vec<Suggestion>, SuggestError> {
        let options = &query.options;
        options.validate()?;

        let seeds = &query.seed_attributes;
        if seeds.is_empty() {
            return Ok(Vec::new());
        }

        let excluded = self.full_exclusions(query);

        let sums = self
            .store
            .aggregate_scores(seeds, &excluded, &options.context)
            .inspect_err(|e| {
                warn!(context = %options.context, error = %e, "statistics lookup failed");
            })?;

        let candidate_rows = sums.len();
        let mut ranking = Ranking::new(
            seeds.len(),
            options.min_probability,
            options.limit,
            &excluded,
        );
        for sum in sums {
            ranking.add(sum);
        }
        let kept = ranking.candidate_count();
        let suggestions = ranking.into_suggestions();

        debug!(
            context = %options.context,
            seeds = seeds.len(),
            candidate_rows,
            above_threshold = kept,
            returned = suggestions.len(),
            "ranked suggestions"
        );
        Ok(suggestions)
    }

    /// Rank suggestions for any seed source with the given options.
    pub fn suggest_from<T>(
        &self,
        source: &T,
        options: &QueryOptions,
    ) -> Result<Vec<Suggestion>, SuggestError>
    where
        T: SeedSource + ?Sized,
    {
        let query = SuggestionQuery::with_options(source.seed_attributes(), options.clone());
        self.suggest(&query)
    }

    /// Rank suggestions for a plain list of attribute ids.
    ///
    /// Repeated ids count once.
    pub fn suggest_by_attribute_ids(
        &self,
        ids: &[AttributeId],
        limit: usize,
        min_probability: f64,
        context: &Context,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let options = QueryOptions::new(limit, min_probability, context.clone());
        self.suggest_from(ids, &options)
    }

    /// Rank suggestions for an entity, seeded by every attribute its snaks
    /// (main snaks, qualifiers and references) refer to.
    pub fn suggest_by_entity(
        &self,
        entity: &Entity,
        limit: usize,
        min_probability: f64,
        context: &Context,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let options = QueryOptions::new(limit, min_probability, context.clone());
        self.suggest_from(entity, &options)
    }

    fn full_exclusions(&self, query: &SuggestionQuery) -> AttributeSet {
        let mut excluded = query.options.excluded_attributes.clone();
        excluded.extend(query.seed_attributes.iter().copied());
        excluded.extend(self.options.deprecated_attributes.iter().copied());
        excluded
    }
}

// =========================================================================
// Tests
// =========================================================================
