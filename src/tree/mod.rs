//! Configuration tree subsystem.
//!
//! # Data Flow
//! ```text
//! NodeDocument (wire format, JSON/XML)
//!     → loader (include expansion, validation)
//!     → TreeBuilder (arena of node records, regexes compiled once)
//!     → Tree (immutable, shared via Arc by all request handlers)
//!
//! Tree → NodeDocument for export of (sub)trees
//! ```
//!
//! # Design Decisions
//! - Nodes live in a single arena; children and parents are indexes
//! - The tree is never mutated after `TreeBuilder::build`
//! - Matching is case-insensitive, storage is case-sensitive

pub mod document;
pub mod lookup;
pub mod node;

pub use document::{NodeDocument, ParameterDocument};
pub use node::{NodeId, NodeRef, Parameter, Tree, TreeBuilder};

/// Separates path segments in `/tree/{path}` and in `search=`.
pub const PATH_SEPARATOR: char = '/';

/// Separates multiple search terms for one level.
pub const QUERY_SEPARATOR: char = ',';

/// Separator that looks plausible to clients but is rejected.
pub const WRONG_SEPARATOR: char = ';';

/// Characters that may not appear in node matches or level names.
pub const RESERVED_CHARACTERS: [char; 3] = [PATH_SEPARATOR, QUERY_SEPARATOR, WRONG_SEPARATOR];

/// Query parameter holding the level names of a search.
pub const LEVELS_PARAMETER: &str = "levels";

/// Query parameter holding the search terms of a search.
pub const SEARCH_PARAMETER: &str = "search";

/// Returns why `name` cannot be used as a node match or level name.
pub fn invalid_name_reason(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("must not be empty".to_string());
    }
    if let Some(c) = name.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Some(format!("must not contain the reserved character '{}'", c));
    }
    if name.eq_ignore_ascii_case(LEVELS_PARAMETER) || name.eq_ignore_ascii_case(SEARCH_PARAMETER) {
        return Some(format!("must not be the reserved name '{}'", name));
    }
    None
}
