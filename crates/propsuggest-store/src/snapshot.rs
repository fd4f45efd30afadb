// Replaceable store snapshot
//
// The offline pipeline refreshes the statistics in bulk. A refresh builds a
// complete new `InMemoryStore` and swaps it in; queries already running keep
// the snapshot they started with.

use std::sync::Arc;

use parking_lot::RwLock;
use propsuggest_core::{AttributeSet, Context, ScoreSum};
use tracing::info;

use crate::memory::InMemoryStore;
use crate::{StatisticsStore, StoreError};

/// A store whose contents can be replaced while queries are being served.
///
/// Every aggregate lookup works on one consistent snapshot. The lock is held
/// only long enough to clone the inner `Arc`.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<InMemoryStore>>,
}

impl SnapshotStore {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// The snapshot currently being served.
    pub fn snapshot(&self) -> Arc<InMemoryStore> {
        self.current.read().clone()
    }

    /// Swap in a new table, returning the previous snapshot.
    pub fn replace(&self, store: InMemoryStore) -> Arc<InMemoryStore> {
        let next = Arc::new(store);
        info!(rows = next.len(), "replacing statistics snapshot");
        std::mem::replace(&mut *self.current.write(), next)
    }
}

impl From<InMemoryStore> for SnapshotStore {
    fn from(store: InMemoryStore) -> Self {
        Self::new(store)
    }
}

impl StatisticsStore for SnapshotStore {
    fn aggregate_scores(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Result<Vec<ScoreSum>, StoreError> {
        let snapshot = self.snapshot();
        Ok(snapshot.score_sums(seeds, excluded, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propsuggest_core::{PairStatistic, attribute_set};

    fn single(first: u64, second: u64, probability: f64) -> InMemoryStore {
        InMemoryStore::from_statistics([PairStatistic::new(first, second, "item", probability)])
            .unwrap()
    }

    #[test]
    fn replace_is_visible_to_later_queries() {
        let store = SnapshotStore::new(single(56, 72, 0.3));
        let seeds = attribute_set([56u64]);

        let before = store
            .aggregate_scores(&seeds, &seeds, &Context::item())
            .unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].score_sum, 0.3);

        let previous = store.replace(single(56, 72, 0.6));
        assert_eq!(previous.len(), 1);

        let after = store
            .aggregate_scores(&seeds, &seeds, &Context::item())
            .unwrap();
        assert_eq!(after[0].score_sum, 0.6);
    }

    #[test]
    fn held_snapshot_is_unaffected_by_replace() {
        let store = SnapshotStore::new(single(1, 2, 0.1));
        let held = store.snapshot();
        store.replace(InMemoryStore::new());
        assert_eq!(held.len(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn default_is_empty() {
        let store = SnapshotStore::default();
        let seeds = attribute_set([1u64]);
        let sums = store
            .aggregate_scores(&seeds, &AttributeSet::new(), &Context::item())
            .unwrap();
        assert!(sums.is_empty());
    }
}
