// Pairwise co-occurrence records

use crate::attribute::AttributeId;
use crate::context::Context;

/// "Given `first` is present in `context`, `second` co-occurs with
/// probability `probability`."
///
/// Created in bulk by the offline pipeline; read-only for the suggester.
#[derive(Debug, Clone, PartialEq)]
pub struct PairStatistic {
    pub first: AttributeId,
    pub second: AttributeId,
    pub context: Context,
    /// Co-occurrence probability in `[0, 1]`.
    pub probability: f64,
    /// Raw number of entities on which both attributes were seen.
    pub count: u64,
}

impl PairStatistic {
    pub fn new(
        first: impl Into<AttributeId>,
        second: impl Into<AttributeId>,
        context: impl Into<Context>,
        probability: f64,
    ) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            context: context.into(),
            probability,
            count: 0,
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Whether the probability is a finite value in `[0, 1]`.
    pub fn has_valid_probability(&self) -> bool {
        (0.0..=1.0).contains(&self.probability)
    }
}

/// One row of an aggregate lookup: the sum of probabilities linking every
/// seed to `attribute`. Not yet normalized by the seed count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSum {
    pub attribute: AttributeId,
    pub score_sum: f64,
}

impl ScoreSum {
    pub fn new(attribute: impl Into<AttributeId>, score_sum: f64) -> Self {
        Self {
            attribute: attribute.into(),
            score_sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds() {
        assert!(PairStatistic::new(1u64, 2u64, "item", 0.0).has_valid_probability());
        assert!(PairStatistic::new(1u64, 2u64, "item", 1.0).has_valid_probability());
        assert!(!PairStatistic::new(1u64, 2u64, "item", 1.5).has_valid_probability());
        assert!(!PairStatistic::new(1u64, 2u64, "item", -0.1).has_valid_probability());
        assert!(!PairStatistic::new(1u64, 2u64, "item", f64::NAN).has_valid_probability());
    }

    #[test]
    fn with_count_sets_count() {
        let stat = PairStatistic::new(56u64, 72u64, "item", 0.3).with_count(12);
        assert_eq!(stat.count, 12);
        assert_eq!(stat.first, AttributeId::new(56));
        assert_eq!(stat.context.as_str(), "item");
    }
}
