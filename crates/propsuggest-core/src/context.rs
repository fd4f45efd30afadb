// Context tags: independent namespaces of co-occurrence statistics

use std::borrow::Borrow;
use std::fmt;

/// A tag partitioning statistics into independent namespaces.
///
/// A query names exactly one context; statistics are never aggregated
/// across contexts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Context(String);

impl Context {
    /// Statistics gathered over items.
    pub const ITEM: &'static str = "item";
    /// Statistics gathered over property entities.
    pub const PROPERTY: &'static str = "property";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The item context.
    pub fn item() -> Self {
        Self::new(Self::ITEM)
    }

    /// The property context.
    pub fn property() -> Self {
        Self::new(Self::PROPERTY)
    }

    /// Build a context from untrusted input, rejecting blank tags.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            None
        } else {
            Some(Self::new(tag))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::item()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Context {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Context {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

// Lets hash maps keyed by `Context` be queried with a plain `&str`.
impl Borrow<str> for Context {
    fn borrow(&self) -> &str {
        &self.0
    }
}
