// Seed sources: everything a suggestion can be computed from
//
// Both input shapes (a plain list of attribute ids, a structured entity)
// project down to the same canonical seed set before ranking.

use propsuggest_core::{AttributeId, AttributeSet, Entity};

/// Something that can be reduced to a set of seed attributes.
///
/// The projection is pure; repeated attributes collapse into one seed.
pub trait SeedSource {
    fn seed_attributes(&self) -> AttributeSet;
}

impl SeedSource for [AttributeId] {
    fn seed_attributes(&self) -> AttributeSet {
        self.iter().copied().collect()
    }
}

impl SeedSource for Vec<AttributeId> {
    fn seed_attributes(&self) -> AttributeSet {
        self.as_slice().seed_attributes()
    }
}

impl SeedSource for AttributeSet {
    fn seed_attributes(&self) -> AttributeSet {
        self.clone()
    }
}

impl SeedSource for Entity {
    fn seed_attributes(&self) -> AttributeSet {
        self.attribute_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propsuggest_core::{Snak, Statement, attribute_set};

    #[test]
    fn id_list_collapses_duplicates() {
        let ids = [72u64, 56, 72].map(AttributeId::new).to_vec();
        assert_eq!(ids.seed_attributes(), attribute_set([56u64, 72]));
        assert_eq!(ids[..].seed_attributes(), attribute_set([56u64, 72]));
    }

    #[test]
    fn entity_projects_all_snaks() {
        let entity = Entity::new(vec![
            Statement::new(Snak::value(56u64, "a")).with_qualifier(Snak::some_value(72u64)),
            Statement::new(Snak::no_value(56u64)),
        ]);
        assert_eq!(entity.seed_attributes(), attribute_set([56u64, 72]));
    }

    #[test]
    fn set_is_its_own_seed_set() {
        let set = attribute_set([1u64, 2]);
        assert_eq!(set.seed_attributes(), set);
    }
}
