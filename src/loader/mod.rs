//! Configuration tree loading.
//!
//! # Data Flow
//! ```text
//! location (http(s)/file/resource URI)
//!     → source.rs (fetch raw text)
//!     → format.rs (parse JSON, fall back to XML)
//!     → include.rs (expand include / include_array recursively)
//!     → validation.rs (names, levels, parameters, timestamps)
//!     → freeze (NodeDocument → immutable Tree)
//! ```
//!
//! # Design Decisions
//! - All-or-nothing: a load either yields a complete tree or one error
//! - No retries; retry policy belongs to the caller
//! - Loading is async only because fetching is; everything after the
//!   fetch is pure

pub mod error;
pub mod format;
pub mod include;
pub mod source;
pub mod validation;

use std::time::Duration;

use url::Url;

pub use error::{LoadError, ValidationError, TIMESTAMP_FORMAT_HINT};
pub use source::{DocumentSource, Resources, UriSource};

use crate::loader::include::IncludeExpander;
use crate::loader::validation::{parse_modified, validate_document};
use crate::tree::{NodeDocument, NodeId, Parameter, Tree, TreeBuilder};

/// Loads configuration trees from a [`DocumentSource`].
pub struct TreeLoader<S = UriSource> {
    source: S,
}

impl TreeLoader<UriSource> {
    /// A loader for http(s), file and bundled resource URIs.
    pub fn new(fetch_timeout: Duration) -> Result<Self, LoadError> {
        Ok(Self::with_source(UriSource::new(fetch_timeout)?))
    }
}

impl<S: DocumentSource> TreeLoader<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Fetch, expand, validate and freeze the configuration at `location`.
    pub async fn load(&self, location: &str) -> Result<Tree, LoadError> {
        let uri = source::parse_location(location)?;
        tracing::info!(uri = %uri, "Loading configuration");

        let text = self.source.fetch(&uri).await?;
        let mut document = format::parse_node(&text, uri.as_str())?;

        let mut expander = IncludeExpander::new(&self.source);
        expander.enter(&uri)?;
        expander.expand(&mut document, Some(&uri)).await?;

        let tree = build_tree(document)?;
        tracing::info!(
            uri = %uri,
            nodes = tree.len(),
            levels = ?tree.levels(),
            "Configuration loaded"
        );
        Ok(tree)
    }

    /// Load a configuration from text. Relative includes resolve against
    /// `base`; without a base they are treated as local file paths.
    pub async fn load_str(&self, text: &str, base: Option<&Url>) -> Result<Tree, LoadError> {
        let origin = base.map_or_else(|| "(inline)".to_string(), Url::to_string);
        let mut document = format::parse_node(text, &origin)?;

        let mut expander = IncludeExpander::new(&self.source);
        if let Some(base) = base {
            expander.enter(base)?;
        }
        expander.expand(&mut document, base).await?;
        build_tree(document)
    }
}

/// Parse and validate a self-contained document (no includes).
pub fn parse_tree(text: &str) -> Result<Tree, LoadError> {
    build_tree(format::parse_node(text, "(inline)")?)
}

/// Validate an expanded document and freeze it into a [`Tree`].
pub fn build_tree(document: NodeDocument) -> Result<Tree, LoadError> {
    validate_document(&document).map_err(LoadError::Validation)?;
    freeze(document)
}

fn freeze(document: NodeDocument) -> Result<Tree, LoadError> {
    let mut builder = match document.levels.clone() {
        Some(levels) => TreeBuilder::new().levels(levels),
        None => TreeBuilder::new(),
    };
    if let Some(name) = document.match_.clone() {
        builder.root_match(name);
    }
    freeze_content(&mut builder, NodeId::ROOT, document, "/")?;
    Ok(builder.build())
}

fn freeze_content(
    builder: &mut TreeBuilder,
    id: NodeId,
    document: NodeDocument,
    location: &str,
) -> Result<(), LoadError> {
    if let Some(parameters) = document.parameters {
        let parameters = parameters
            .into_iter()
            .map(|p| Parameter::new(p.key.unwrap_or_default(), p.value.unwrap_or_default()))
            .collect();
        builder.set_parameters(id, parameters);
    }

    if let Some(modified) = document.modified {
        let parsed = parse_modified(&modified).ok_or_else(|| {
            LoadError::Validation(vec![ValidationError::InvalidModified {
                location: location.to_string(),
                value: modified.clone(),
            }])
        })?;
        builder.set_modified(id, parsed);
    }

    for child in document.nodes.into_iter().flatten() {
        let name = child.match_.clone().unwrap_or_default();
        let child_location = if id == NodeId::ROOT {
            name.clone()
        } else {
            format!("{}/{}", location, name)
        };
        let child_id = builder.add_child(id, name);
        freeze_content(builder, child_id, child, &child_location)?;
    }
    Ok(())
}
