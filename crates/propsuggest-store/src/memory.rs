// In-memory statistics store
//
// Layout: context -> first attribute -> second attribute -> entry. Indexing by
// the first attribute makes an aggregate lookup touch only the rows of the
// seeds, never the whole table.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use propsuggest_core::{AttributeId, AttributeSet, Context, PairStatistic, ScoreSum};

use crate::{StatisticsStore, StoreError, TableError};

#[derive(Debug, Clone, Copy)]
struct PairEntry {
    probability: f64,
    count: u64,
}

/// All pairs of one context, grouped by their first attribute.
#[derive(Debug, Default, Clone)]
struct ContextTable {
    by_first: HashMap<AttributeId, HashMap<AttributeId, PairEntry>>,
    len: usize,
}

/// A store holding every statistic in memory.
///
/// Enforces the one-statistic-per-`(first, second, context)` invariant at
/// insert time. Once built it is only read; share it behind an `Arc` (or a
/// [`SnapshotStore`](crate::SnapshotStore)) to serve concurrent queries.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    contexts: HashMap<Context, ContextTable>,
    len: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a sequence of statistics.
    ///
    /// Fails on the first invalid or duplicate statistic.
    pub fn from_statistics<I>(statistics: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = PairStatistic>,
    {
        let mut store = Self::new();
        for statistic in statistics {
            store.insert(statistic)?;
        }
        Ok(store)
    }

    /// Add one statistic.
    ///
    /// Rejects probabilities outside `[0, 1]` (including NaN) and a second
    /// statistic for an already known `(first, second, context)` triple.
    pub fn insert(&mut self, statistic: PairStatistic) -> Result<(), TableError> {
        if !statistic.has_valid_probability() {
            return Err(TableError::ProbabilityOutOfRange {
                first: statistic.first,
                second: statistic.second,
                context: statistic.context,
                probability: statistic.probability,
            });
        }

        let table = self.contexts.entry(statistic.context.clone()).or_default();
        let row = table.by_first.entry(statistic.first).or_default();
        match row.entry(statistic.second) {
            Entry::Occupied(_) => Err(TableError::DuplicatePair {
                first: statistic.first,
                second: statistic.second,
                context: statistic.context,
            }),
            Entry::Vacant(slot) => {
                slot.insert(PairEntry {
                    probability: statistic.probability,
                    count: statistic.count,
                });
                table.len += 1;
                self.len += 1;
                Ok(())
            }
        }
    }

    /// Look up a single statistic.
    pub fn get(
        &self,
        first: AttributeId,
        second: AttributeId,
        context: &Context,
    ) -> Option<PairStatistic> {
        let entry = self
            .contexts
            .get(context.as_str())?
            .by_first
            .get(&first)?
            .get(&second)?;
        Some(PairStatistic {
            first,
            second,
            context: context.clone(),
            probability: entry.probability,
            count: entry.count,
        })
    }

    /// Total number of statistics across all contexts.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of statistics in one context.
    pub fn context_len(&self, context: &str) -> usize {
        self.contexts.get(context).map_or(0, |table| table.len)
    }

    /// The contexts that hold at least one statistic, sorted by tag.
    pub fn contexts(&self) -> Vec<&Context> {
        let mut contexts: Vec<&Context> = self
            .contexts
            .iter()
            .filter(|(_, table)| table.len > 0)
            .map(|(context, _)| context)
            .collect();
        contexts.sort();
        contexts
    }

    /// Sum probabilities for the seeds. Infallible; the trait wraps it.
    pub fn score_sums(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Vec<ScoreSum> {
        let Some(table) = self.contexts.get(context.as_str()) else {
            return Vec::new();
        };

        // Seeds are visited in ascending order, so each candidate's sum is
        // accumulated in the same order on every call.
        let mut sums: HashMap<AttributeId, f64> = HashMap::new();
        for seed in seeds {
            let Some(row) = table.by_first.get(seed) else {
                continue;
            };
            for (second, entry) in row {
                if excluded.contains(second) {
                    continue;
                }
                *sums.entry(*second).or_insert(0.0) += entry.probability;
            }
        }

        sums.into_iter()
            .map(|(attribute, score_sum)| ScoreSum {
                attribute,
                score_sum,
            })
            .collect()
    }
}

impl StatisticsStore for InMemoryStore {
    fn aggregate_scores(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Result<Vec<ScoreSum>, StoreError> {
        Ok(self.score_sums(seeds, excluded, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propsuggest_core::attribute_set;

    fn store(stats: &[(u64, u64, &str, f64)]) -> InMemoryStore {
        InMemoryStore::from_statistics(
            stats
                .iter()
                .map(|&(a, b, ctx, p)| PairStatistic::new(a, b, ctx, p)),
        )
        .unwrap()
    }

    /// Sums for `seeds` in `context`, sorted by attribute id.
    fn sums(
        store: &InMemoryStore,
        seeds: &[u64],
        excluded: &[u64],
        context: &str,
    ) -> Vec<(u64, f64)> {
        let seeds = attribute_set(seeds.iter().copied());
        let excluded = attribute_set(excluded.iter().copied());
        let mut sums = store.score_sums(&seeds, &excluded, &context.into());
        sums.sort_by_key(|s| s.attribute);
        sums.into_iter()
            .map(|s| (s.attribute.numeric_id(), s.score_sum))
            .collect()
    }

    fn probability(store: &InMemoryStore, first: u64, second: u64, context: &str) -> Option<f64> {
        let (first, second) = (AttributeId::new(first), AttributeId::new(second));
        let stat = store.get(first, second, &context.into())?;
        Some(stat.probability)
    }

    #[test]
    fn single_pair_lookup() {
        let store = store(&[(56, 72, "item", 0.3)]);
        assert_eq!(sums(&store, &[56], &[56], "item"), vec![(72, 0.3)]);
    }

    #[test]
    fn sums_across_seeds() {
        let store = store(&[
            (1, 4, "item", 0.4),
            (3, 4, "item", 0.6),
            (1, 5, "item", 0.2),
        ]);
        let got = sums(&store, &[1, 3], &[1, 3], "item");
        assert_eq!(got, vec![(4, 1.0), (5, 0.2)]);
    }

    #[test]
    fn excluded_attributes_are_skipped() {
        let store = store(&[(1, 2, "item", 0.5), (1, 3, "item", 0.7)]);
        assert_eq!(sums(&store, &[1], &[1, 3], "item"), vec![(2, 0.5)]);
    }

    #[test]
    fn contexts_are_isolated() {
        let store = store(&[(56, 72, "item", 0.3), (56, 80, "property", 0.9)]);
        assert_eq!(sums(&store, &[56], &[], "item"), vec![(72, 0.3)]);
        assert_eq!(sums(&store, &[56], &[], "property"), vec![(80, 0.9)]);
        assert!(sums(&store, &[56], &[], "lexeme").is_empty());
    }

    #[test]
    fn unknown_seed_yields_nothing() {
        let store = store(&[(56, 72, "item", 0.3)]);
        assert!(sums(&store, &[99], &[], "item").is_empty());
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let mut store = store(&[(56, 72, "item", 0.3)]);
        let duplicate = PairStatistic::new(56u64, 72u64, "item", 0.4);
        let err = store.insert(duplicate).unwrap_err();
        assert!(matches!(err, TableError::DuplicatePair { .. }));
        // Same pair in another context is a different triple.
        let other_context = PairStatistic::new(56u64, 72u64, "property", 0.4);
        store.insert(other_context).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(probability(&store, 56, 72, "item"), Some(0.3));
        assert_eq!(probability(&store, 56, 72, "property"), Some(0.4));
    }

    #[test]
    fn invalid_probability_is_rejected() {
        let mut store = InMemoryStore::new();
        for p in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let err = store
                .insert(PairStatistic::new(1u64, 2u64, "item", p))
                .unwrap_err();
            assert!(matches!(err, TableError::ProbabilityOutOfRange { .. }));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn sizes_per_context() {
        let store = store(&[
            (1, 2, "item", 0.1),
            (1, 3, "item", 0.1),
            (2, 1, "property", 0.1),
        ]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.context_len("item"), 2);
        assert_eq!(store.context_len("property"), 1);
        assert_eq!(store.context_len("lexeme"), 0);
        let tags: Vec<&str> = store.contexts().iter().map(|c| c.as_str()).collect();
        assert_eq!(tags, vec!["item", "property"]);
    }

    #[test]
    fn get_keeps_count() {
        let stat = PairStatistic::new(31u64, 21u64, "item", 0.8).with_count(40);
        let store = InMemoryStore::from_statistics([stat]).unwrap();
        let (p31, p21) = (AttributeId::new(31), AttributeId::new(21));
        assert_eq!(store.get(p31, p21, &Context::item()).unwrap().count, 40);
        assert!(store.get(p21, p31, &Context::item()).is_none());
    }
}
