// Structured entities: statements made of attribute assertions (snaks)

use crate::attribute::{AttributeId, AttributeSet};

/// What a snak asserts about its attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnakKind {
    /// The attribute has this concrete (serialized) value.
    Value(String),
    /// The attribute has some value that is not known.
    SomeValue,
    /// The attribute is asserted to have no value.
    NoValue,
}

/// A single attribute assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snak {
    pub attribute: AttributeId,
    pub kind: SnakKind,
}

impl Snak {
    pub fn value(attribute: impl Into<AttributeId>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            kind: SnakKind::Value(value.into()),
        }
    }

    pub fn some_value(attribute: impl Into<AttributeId>) -> Self {
        Self {
            attribute: attribute.into(),
            kind: SnakKind::SomeValue,
        }
    }

    pub fn no_value(attribute: impl Into<AttributeId>) -> Self {
        Self {
            attribute: attribute.into(),
            kind: SnakKind::NoValue,
        }
    }
}

/// A statement: a main snak plus optional qualifiers and references.
///
/// Each reference is a group of snaks describing one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub main_snak: Snak,
    pub qualifiers: Vec<Snak>,
    pub references: Vec<Vec<Snak>>,
}

impl Statement {
    pub fn new(main_snak: Snak) -> Self {
        Self {
            main_snak,
            qualifiers: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn with_qualifier(mut self, snak: Snak) -> Self {
        self.qualifiers.push(snak);
        self
    }

    pub fn with_reference(mut self, snaks: Vec<Snak>) -> Self {
        self.references.push(snaks);
        self
    }

    /// Every snak of the statement: main snak, qualifiers, then references.
    pub fn all_snaks(&self) -> impl Iterator<Item = &Snak> {
        std::iter::once(&self.main_snak)
            .chain(self.qualifiers.iter())
            .chain(self.references.iter().flatten())
    }
}

/// An entity described by a list of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    pub statements: Vec<Statement>,
}

impl Entity {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Every snak on the entity, including qualifiers and references.
    pub fn all_snaks(&self) -> impl Iterator<Item = &Snak> {
        self.statements.iter().flat_map(Statement::all_snaks)
    }

    /// Project the entity down to the set of attributes its snaks refer to.
    ///
    /// Repeated attributes collapse into one entry.
    pub fn attribute_ids(&self) -> AttributeSet {
        self.all_snaks().map(|snak| snak.attribute).collect()
    }
}
