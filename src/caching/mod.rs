//! Response validators and conditional retrieval.
//!
//! # Data Flow
//! ```text
//! Response payload
//!     → etag.rs (salted SHA-256 over canonical JSON)
//!     → last_modified() (nearest modified timestamp up the tree)
//!     → conditional.rs (compare against client preconditions)
//!     → Return: Freshness::Modified | Freshness::NotModified
//! ```

pub mod conditional;
pub mod etag;

pub use conditional::{format_http_date, parse_http_date, Freshness, Preconditions, Validators};
pub use etag::{EtagError, EtagGenerator, DEFAULT_ETAG_SALT};

use chrono::{DateTime, Utc};

use crate::tree::NodeRef;

/// Modification time of a node: its own, else the nearest ancestor's.
pub fn last_modified(node: NodeRef<'_>) -> Option<DateTime<Utc>> {
    std::iter::once(node)
        .chain(node.ancestors())
        .find_map(|n| n.modified())
}
