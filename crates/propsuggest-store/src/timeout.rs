// Deadline wrapper for slow stores

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use propsuggest_core::{AttributeSet, Context, ScoreSum};
use tracing::warn;

use crate::{StatisticsStore, StoreError};

/// Default bound on lookups running at once, counting abandoned ones.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Wraps a store whose lookups may block on I/O and bounds how long a
/// caller waits for an answer.
///
/// Each lookup runs on a worker thread. If no answer arrives within the
/// timeout the caller gets [`StoreError::Timeout`]; the worker is left to
/// finish on its own and its late result is discarded. At most
/// `max_in_flight` workers exist at any time. Once that many are busy,
/// further lookups fail with [`StoreError::Unavailable`] without spawning.
pub struct TimeoutStore<S> {
    inner: Arc<S>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl<S> TimeoutStore<S>
where
    S: StatisticsStore + 'static,
{
    pub fn new(inner: Arc<S>, timeout: Duration) -> Self {
        Self::with_max_in_flight(inner, timeout, DEFAULT_MAX_IN_FLIGHT)
    }

    pub fn with_max_in_flight(inner: Arc<S>, timeout: Duration, max_in_flight: usize) -> Self {
        Self {
            inner,
            timeout,
            max_in_flight,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Lookups currently running on worker threads, including those whose
    /// caller has already timed out.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire_slot(&self) -> Option<WorkerSlot> {
        let max = self.max_in_flight;
        let reserve = |n: usize| (n < max).then_some(n + 1);
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, reserve)
            .ok()?;
        Some(WorkerSlot(Arc::clone(&self.in_flight)))
    }
}

/// One reserved worker; released when dropped.
struct WorkerSlot(Arc<AtomicUsize>);

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<S> StatisticsStore for TimeoutStore<S>
where
    S: StatisticsStore + 'static,
{
    fn aggregate_scores(
        &self,
        seeds: &AttributeSet,
        excluded: &AttributeSet,
        context: &Context,
    ) -> Result<Vec<ScoreSum>, StoreError> {
        let Some(slot) = self.acquire_slot() else {
            let max = self.max_in_flight;
            warn!(max_in_flight = max, "lookups saturated");
            return Err(StoreError::Unavailable(format!("{max} lookups already in flight")));
        };

        let (sender, receiver) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        let (seeds, excluded, context) = (seeds.clone(), excluded.clone(), context.clone());

        thread::Builder::new()
            .name("propsuggest-lookup".to_string())
            .spawn(move || {
                let result = inner.aggregate_scores(&seeds, &excluded, &context);
                // The slot is free before the caller can see the answer.
                drop(slot);
                // The receiver is gone if the caller already timed out.
                let _ = sender.send(result);
            })
            .map_err(|e| StoreError::Unavailable(format!("failed to spawn lookup thread: {e}")))?;

        match receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(timeout = ?self.timeout, "statistics lookup timed out");
                Err(StoreError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(StoreError::Unavailable(
                "lookup thread exited without an answer".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Instant;

    use propsuggest_core::{PairStatistic, attribute_set};

    use crate::memory::InMemoryStore;

    /// A store that sleeps before answering and tracks how many lookups are
    /// running inside it.
    struct SlowStore {
        delay: Duration,
        live: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowStore {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                live: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    impl StatisticsStore for SlowStore {
        fn aggregate_scores(
            &self,
            _seeds: &AttributeSet,
            _excluded: &AttributeSet,
            _context: &Context,
        ) -> Result<Vec<ScoreSum>, StoreError> {
            let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(self.delay);
            self.live.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    /// A store whose backend is down.
    struct DownStore;

    impl StatisticsStore for DownStore {
        fn aggregate_scores(
            &self,
            _seeds: &AttributeSet,
            _excluded: &AttributeSet,
            _context: &Context,
        ) -> Result<Vec<ScoreSum>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn lookup<S: StatisticsStore>(store: &S) -> Result<Vec<ScoreSum>, StoreError> {
        let seeds = attribute_set([1u64]);
        let excluded = AttributeSet::new();
        store.aggregate_scores(&seeds, &excluded, &Context::item())
    }

    #[test]
    fn fast_store_answers_through_wrapper() {
        let stat = PairStatistic::new(56u64, 72u64, "item", 0.3);
        let inner = InMemoryStore::from_statistics([stat]).unwrap();
        let store = TimeoutStore::new(Arc::new(inner), Duration::from_secs(5));
        assert_eq!(store.timeout(), Duration::from_secs(5));
        assert_eq!(store.max_in_flight(), DEFAULT_MAX_IN_FLIGHT);

        let seeds = attribute_set([56u64]);
        let sums = store
            .aggregate_scores(&seeds, &seeds, &Context::item())
            .unwrap();
        assert_eq!(sums.len(), 1);
        assert_eq!(sums[0].score_sum, 0.3);
        assert_eq!(store.in_flight(), 0);
    }

    #[test]
    fn slow_store_times_out() {
        let slow = Arc::new(SlowStore::new(Duration::from_millis(500)));
        let store = TimeoutStore::new(slow, Duration::from_millis(20));
        let err = lookup(&store).unwrap_err();
        assert_eq!(err, StoreError::Timeout(Duration::from_millis(20)));
    }

    #[test]
    fn inner_failure_passes_through() {
        let store = TimeoutStore::new(Arc::new(DownStore), Duration::from_secs(5));
        let err = lookup(&store).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn slots_are_released_after_each_answer() {
        let inner = Arc::new(InMemoryStore::new());
        let store = TimeoutStore::with_max_in_flight(inner, Duration::from_secs(5), 1);
        for _ in 0..5 {
            assert!(lookup(&store).unwrap().is_empty());
            assert_eq!(store.in_flight(), 0);
        }
    }

    #[test]
    fn hung_backend_does_not_grow_workers_without_bound() {
        let hung = Arc::new(SlowStore::new(Duration::from_millis(400)));
        let store =
            TimeoutStore::with_max_in_flight(Arc::clone(&hung), Duration::from_millis(5), 4);

        let mut timed_out = 0;
        let mut rejected = 0;
        for _ in 0..50 {
            match lookup(&store) {
                Err(StoreError::Timeout(_)) => timed_out += 1,
                Err(StoreError::Unavailable(_)) => rejected += 1,
                other => panic!("unexpected result: {other:?}"),
            }
            assert!(store.in_flight() <= 4);
        }
        assert_eq!(timed_out, 4);
        assert_eq!(rejected, 46);
        assert!(hung.peak.load(Ordering::SeqCst) <= 4);

        // Workers give their slots back once the backend answers.
        let deadline = Instant::now() + Duration::from_secs(10);
        while store.in_flight() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(store.in_flight(), 0);
        assert!(matches!(lookup(&store), Err(StoreError::Timeout(_))));
    }
}
