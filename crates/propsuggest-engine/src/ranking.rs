// Ranking of aggregated candidates: averaging, threshold, order, limit

use std::collections::HashSet;

use propsuggest_core::{AttributeId, AttributeSet, ScoreSum, Suggestion};

/// Collects aggregated candidates for one query and turns them into the
/// final ranked list.
///
/// Each candidate's raw probability sum is divided by the seed count, so an
/// attribute linked to every seed outranks one linked strongly to a single
/// seed. Candidates at or below the minimum probability, excluded
/// candidates and repeated candidates are dropped on the way in.
pub struct Ranking<'a> {
    /// Number of seed attributes; the averaging divisor.
    seed_count: usize,
    /// Exclusive lower bound on the average score.
    min_probability: f64,
    /// Maximum length of the final list.
    limit: usize,
    /// Attributes that must never be suggested.
    excluded: &'a AttributeSet,
    /// Accepted candidates, unordered until `into_suggestions`.
    candidates: Vec<Suggestion>,
    /// Attributes already offered, accepted or not.
    seen: HashSet<AttributeId>,
}

impl<'a> Ranking<'a> {
    /// `seed_count` must be non-zero; the engine never ranks for an empty
    /// seed set.
    pub fn new(
        seed_count: usize,
        min_probability: f64,
        limit: usize,
        excluded: &'a AttributeSet,
    ) -> Self {
        debug_assert!(seed_count > 0);
        Self {
            seed_count,
            min_probability,
            limit,
            excluded,
            candidates: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Offer one aggregated candidate. Returns whether it was kept.
    pub fn add(&mut self, sum: ScoreSum) -> bool {
        if !self.seen.insert(sum.attribute) {
            return false; // duplicate
        }
        if self.excluded.contains(&sum.attribute) {
            return false;
        }
        let score = sum.score_sum / self.seed_count as f64;
        // Strict: a score equal to the threshold is dropped. NaN never passes.
        if score.is_nan() || score <= self.min_probability {
            return false;
        }
        self.candidates.push(Suggestion::new(sum.attribute, score));
        true
    }

    /// Number of candidates kept so far.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Sort by descending score (ties by ascending id) and keep the first
    /// `limit` entries.
    pub fn into_suggestions(mut self) -> Vec<Suggestion> {
        self.candidates.sort_by(Suggestion::rank_cmp);
        self.candidates.truncate(self.limit);
        self.candidates
    }
}
