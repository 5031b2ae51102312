//! Matching subsystem.
//!
//! # Data Flow
//! ```text
//! Search request (level → terms, possibly several terms per level)
//!     → query.rs (expand into independent SearchQuery values)
//!     → engine.rs (reorder to tree levels, deepest-match walk)
//!     → Return: Vec<MatchResult>, empty when anything found nothing
//! ```
//!
//! # Design Decisions
//! - Stateless: a Matcher only borrows the immutable tree
//! - Regexes are compiled when the tree is built, never per query
//! - Deterministic: same tree and query always give the same result

pub mod engine;
pub mod query;

pub use engine::{MatchResult, Matcher};
pub use query::{expand_terms, QueryError, SearchQuery};
