//! Query-string handling for `/tree`.
//!
//! Two search styles are accepted:
//! ```text
//! /tree?service=traffic,weather&model=cheapo       per-level parameters
//! /tree?levels=service,model&search=traffic,weather/cheapo
//! ```
//! Within one level, `,` separates alternative terms. In `search=`, `/`
//! separates levels. `;` is rejected wherever a separator is expected.

use url::form_urlencoded;

use crate::matching::QueryError;
use crate::tree::{LEVELS_PARAMETER, PATH_SEPARATOR, QUERY_SEPARATOR, SEARCH_PARAMETER, WRONG_SEPARATOR};

/// What a `/tree` request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeQuery {
    /// No search parameters: export the addressed node.
    Lookup,
    /// Per-level term lists, in the order the client gave them.
    Search(Vec<(String, Vec<String>)>),
}

pub fn parse_tree_query(raw: Option<&str>) -> Result<TreeQuery, QueryError> {
    let pairs: Vec<(String, String)> = raw
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    if pairs.is_empty() {
        return Ok(TreeQuery::Lookup);
    }

    let mut levels = None;
    let mut search = None;
    let mut per_level = Vec::new();
    for (name, value) in pairs {
        if name.eq_ignore_ascii_case(LEVELS_PARAMETER) {
            levels = Some(value);
        } else if name.eq_ignore_ascii_case(SEARCH_PARAMETER) {
            search = Some(value);
        } else {
            per_level.push((name, value));
        }
    }

    if !per_level.is_empty() {
        if levels.is_some() {
            return Err(QueryError::MixedSearchStyles(LEVELS_PARAMETER));
        }
        if search.is_some() {
            return Err(QueryError::MixedSearchStyles(SEARCH_PARAMETER));
        }
        return per_level
            .into_iter()
            .map(|(level, value)| {
                let terms = split_checked(&level, &value, QUERY_SEPARATOR)?;
                Ok((level, terms))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(TreeQuery::Search);
    }

    match (levels, search) {
        (Some(levels), Some(search)) => combined(&levels, &search).map(TreeQuery::Search),
        (Some(_), None) => Err(QueryError::IncompleteSearch(LEVELS_PARAMETER, SEARCH_PARAMETER)),
        (None, Some(_)) => Err(QueryError::IncompleteSearch(SEARCH_PARAMETER, LEVELS_PARAMETER)),
        (None, None) => Ok(TreeQuery::Lookup),
    }
}

fn combined(levels: &str, search: &str) -> Result<Vec<(String, Vec<String>)>, QueryError> {
    let names = split_checked(LEVELS_PARAMETER, levels, QUERY_SEPARATOR)?;
    let segments = split_checked(SEARCH_PARAMETER, search, PATH_SEPARATOR)?;
    if names.len() != segments.len() {
        return Err(QueryError::TermCountMismatch {
            levels: names.len(),
            terms: segments.len(),
        });
    }

    Ok(names
        .into_iter()
        .zip(segments)
        .map(|(name, segment)| {
            let terms = segment.split(QUERY_SEPARATOR).map(str::to_string).collect();
            (name, terms)
        })
        .collect())
}

fn split_checked(parameter: &str, value: &str, expected: char) -> Result<Vec<String>, QueryError> {
    if value.contains(WRONG_SEPARATOR) {
        return Err(QueryError::WrongSeparator {
            parameter: parameter.to_string(),
            found: WRONG_SEPARATOR,
            expected,
        });
    }
    Ok(value.split(expected).map(str::to_string).collect())
}
