// Attribute (property) identifiers

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Prefix used by the serialized form of an attribute id (`P56`).
pub const ATTRIBUTE_PREFIX: char = 'P';

/// An opaque numeric identifier for a property/attribute.
///
/// Equality and ordering follow the integer value. The `Display` form is the
/// prefixed serialization (`P56`); parsing accepts both `P56` and `56`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeId(u64);

/// Canonical seed/exclusion set representation.
///
/// Ordered so that iteration (and therefore floating-point summation over
/// seeds) is reproducible.
pub type AttributeSet = BTreeSet<AttributeId>;

impl AttributeId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric part of the id.
    pub const fn numeric_id(self) -> u64 {
        self.0
    }
}

impl From<u64> for AttributeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<AttributeId> for u64 {
    fn from(id: AttributeId) -> Self {
        id.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ATTRIBUTE_PREFIX}{}", self.0)
    }
}

/// Error returned when a string is not a valid attribute id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid attribute id: {0:?}")]
pub struct ParseAttributeIdError(pub String);

impl FromStr for AttributeId {
    type Err = ParseAttributeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix(ATTRIBUTE_PREFIX)
            .or_else(|| trimmed.strip_prefix(ATTRIBUTE_PREFIX.to_ascii_lowercase()))
            .unwrap_or(trimmed);
        // u64::from_str accepts a leading '+', which is not a valid id.
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAttributeIdError(s.to_string()));
        }
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseAttributeIdError(s.to_string()))
    }
}

/// Collect attribute ids into the canonical set, collapsing duplicates.
pub fn attribute_set<I>(ids: I) -> AttributeSet
where
    I: IntoIterator,
    I::Item: Into<AttributeId>,
{
    ids.into_iter().map(Into::into).collect()
}
