//! Search queries and client errors.
//!
//! # Responsibilities
//! - Represent one resolution request (level name → search term)
//! - Expand per-level term lists into independent sub-queries
//! - Define the client-error taxonomy of query handling

use thiserror::Error;

/// A rejected request. Reported to the client, never logged as a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A query names a level the tree does not declare.
    #[error("Unknown level '{level}'; known levels are: {known}")]
    UnknownLevel { level: String, known: String },

    /// A query names the same level twice.
    #[error("Level '{0}' is specified more than once")]
    DuplicateLevel(String),

    /// A query uses the reserved wrong separator.
    #[error("Separator '{found}' is not allowed in '{parameter}', use '{expected}' instead")]
    WrongSeparator {
        parameter: String,
        found: char,
        expected: char,
    },

    /// `levels=` and `search=` disagree in length.
    #[error("Found {levels} levels but {terms} search terms")]
    TermCountMismatch { levels: usize, terms: usize },

    /// Only one of `levels=` and `search=` was given.
    #[error("Parameters '{0}' and '{1}' must be used together")]
    IncompleteSearch(&'static str, &'static str),

    /// `levels=`/`search=` combined with per-level parameters.
    #[error("Parameters '{0}' cannot be combined with per-level parameters")]
    MixedSearchStyles(&'static str),

    /// Search parameters on a path other than the tree root.
    #[error("Search parameters are only allowed on the tree root, not on '{0}'")]
    SearchOnPath(String),
}

/// Search terms keyed by level name, in the order the client gave them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, level: impl Into<String>, term: impl Into<String>) -> Self {
        self.insert(level, term);
        self
    }

    pub fn insert(&mut self, level: impl Into<String>, term: impl Into<String>) {
        self.terms.push((level.into(), term.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<L: Into<String>, T: Into<String>> FromIterator<(L, T)> for SearchQuery {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut query = SearchQuery::new();
        for (level, term) in iter {
            query.insert(level, term);
        }
        query
    }
}

/// Expand per-level term lists into sub-queries.
///
/// The number of sub-queries equals the longest term list. A level with a
/// shorter list repeats its last listed term; a level with no terms at all
/// contributes the empty term.
pub fn expand_terms(levels: &[(String, Vec<String>)]) -> Vec<SearchQuery> {
    let count = levels.iter().map(|(_, terms)| terms.len()).max().unwrap_or(0).max(1);
    (0..count)
        .map(|i| {
            levels
                .iter()
                .map(|(level, terms)| {
                    let term = terms.get(i).or_else(|| terms.last()).cloned().unwrap_or_default();
                    (level.clone(), term)
                })
                .collect()
        })
        .collect()
}
