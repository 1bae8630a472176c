//! # engine
//!
//! The query core: predicate composition and the [`TradeQueryEngine`] that
//! evaluates lookups, searches, filters, sorting and pagination.

pub mod predicate;
pub mod query;

pub use predicate::FilterCriteria;
pub use query::{PageRequest, QueryError, SortSpec, TradeQueryEngine};
