//! Deepest-match resolution.
//!
//! # Algorithm
//! ```text
//! terms  = query reordered to the tree's level order ("" if omitted)
//! cursor = best = root
//! for term in terms:
//!     child = first child matching term literally (case-insensitive)
//!          ?? first child matching term as regex (case-insensitive)
//!     if none: stop
//!     cursor = child; if child has parameters: best = child
//! result = parameters of best, unless best is a root without parameters
//! ```
//!
//! # Design Decisions
//! - Literal matches beat regex matches at the same level, regardless of
//!   sibling order
//! - One failing sub-query fails the whole batch

use chrono::{DateTime, Utc};

use crate::caching::last_modified;
use crate::matching::query::{QueryError, SearchQuery};
use crate::tree::{NodeId, NodeRef, Parameter, Tree};

/// The node a query resolved to, together with the path that led there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    node: NodeId,
    parameters: Vec<Parameter>,
    matched: Vec<(String, String)>,
    last_modified: Option<DateTime<Utc>>,
}

impl MatchResult {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Inherited modification time of the resolved node.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// True if the query fell back to the root's parameters.
    pub fn is_root(&self) -> bool {
        self.node == NodeId::ROOT
    }

    /// Slash-joined match strings from the root; empty for the root.
    pub fn path(&self) -> String {
        self.matched
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The path in query form, e.g. `service=traffic&model=cheapo`;
    /// empty for the root.
    pub fn matched(&self) -> String {
        self.matched
            .iter()
            .map(|(level, name)| format!("{}={}", level, name))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Resolves search queries against an immutable tree.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'t> {
    tree: &'t Tree,
}

impl<'t> Matcher<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self { tree }
    }

    /// Resolve a batch of independent queries.
    ///
    /// Client errors in any query fail the call. If any query resolves to
    /// nothing the result is empty, even when other queries did resolve.
    pub fn resolve(&self, queries: &[SearchQuery]) -> Result<Vec<MatchResult>, QueryError> {
        let canonical = queries
            .iter()
            .map(|q| self.canonical_terms(q))
            .collect::<Result<Vec<_>, _>>()?;

        let results: Option<Vec<MatchResult>> = canonical.iter().map(|terms| self.walk(terms)).collect();
        Ok(results.unwrap_or_default())
    }

    /// Resolve a single query; `Ok(None)` means nothing is configured for it.
    pub fn resolve_one(&self, query: &SearchQuery) -> Result<Option<MatchResult>, QueryError> {
        let terms = self.canonical_terms(query)?;
        Ok(self.walk(&terms))
    }

    /// Reorder the query's terms into the tree's level order.
    fn canonical_terms<'q>(&self, query: &'q SearchQuery) -> Result<Vec<&'q str>, QueryError> {
        let levels = self.tree.levels();
        let mut terms: Vec<Option<&'q str>> = vec![None; levels.len()];

        for (level, term) in query.iter() {
            let index = levels
                .iter()
                .position(|known| known.to_lowercase() == level.to_lowercase())
                .ok_or_else(|| QueryError::UnknownLevel {
                    level: level.to_string(),
                    known: levels.join(", "),
                })?;
            if terms[index].replace(term).is_some() {
                return Err(QueryError::DuplicateLevel(level.to_string()));
            }
        }
        Ok(terms.into_iter().map(Option::unwrap_or_default).collect())
    }

    fn walk(&self, terms: &[&str]) -> Option<MatchResult> {
        let root = self.tree.root();
        let mut cursor = root;
        let mut best = root;

        for term in terms {
            let Some(child) = match_child(cursor, term) else {
                break;
            };
            cursor = child;
            if child.parameters().is_some() {
                best = child;
            }
        }

        let parameters = best.parameters()?.to_vec();
        let levels = self.tree.levels();
        let matched = best
            .path_segments()
            .into_iter()
            .zip(levels)
            .map(|(name, level)| (level.clone(), name.to_string()))
            .collect();

        Some(MatchResult {
            node: best.id(),
            parameters,
            matched,
            last_modified: last_modified(best),
        })
    }
}

/// First child matching `term` literally, else first child matching it as
/// a regex.
fn match_child<'t>(node: NodeRef<'t>, term: &str) -> Option<NodeRef<'t>> {
    node.children()
        .find(|child| child.matches_literal(term))
        .or_else(|| node.children().find(|child| child.matches_pattern(term)))
}
