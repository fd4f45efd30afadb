//! Shared data model for the propsuggest property suggester.
//!
//! # Architecture
//!
//! - [`attribute`] -- Attribute identifiers and attribute sets
//! - [`context`] -- Context tags partitioning the statistics
//! - [`statistic`] -- Pairwise co-occurrence records
//! - [`suggestion`] -- Ranked suggestion records
//! - [`entity`] -- Structured entities (statements and snaks)

pub mod attribute;
pub mod context;
pub mod entity;
pub mod statistic;
pub mod suggestion;

pub use attribute::{AttributeId, AttributeSet, ParseAttributeIdError, attribute_set};
pub use context::Context;
pub use entity::{Entity, Snak, SnakKind, Statement};
pub use statistic::{PairStatistic, ScoreSum};
pub use suggestion::Suggestion;
