// Suggestion result record

use std::cmp::Ordering;

use crate::attribute::AttributeId;

/// A suggested attribute with its confidence score.
///
/// The score is the average co-occurrence probability over the seed set.
/// It is computed per query and carries no reference back to the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion {
    pub attribute: AttributeId,
    pub score: f64,
}

impl Suggestion {
    pub fn new(attribute: impl Into<AttributeId>, score: f64) -> Self {
        Self {
            attribute: attribute.into(),
            score,
        }
    }

    /// Ranking order: higher score first, ties broken by ascending id.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.attribute.cmp(&other.attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_cmp_orders_by_score_then_id() {
        let mut list = vec![
            Suggestion::new(7u64, 0.2),
            Suggestion::new(3u64, 0.5),
            Suggestion::new(5u64, 0.2),
            Suggestion::new(1u64, 0.9),
        ];
        list.sort_by(Suggestion::rank_cmp);
        let ids: Vec<u64> = list.iter().map(|s| s.attribute.numeric_id()).collect();
        assert_eq!(ids, vec![1, 3, 5, 7]);
    }
}
