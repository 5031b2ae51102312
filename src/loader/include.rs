//! Recursive include expansion.
//!
//! # Responsibilities
//! - Replace `include` nodes with the node document they reference
//! - Replace `include_array` references with the array of child nodes
//! - Detect include recursion with a stack of in-flight URIs
//!
//! # Design Decisions
//! - Includes resolve relative to the document they appear in
//! - The same document may be included several times as long as it is not
//!   included from within itself
//! - Expansion is depth-first; the first failure aborts the load

use futures_util::future::BoxFuture;
use url::Url;

use crate::loader::error::LoadError;
use crate::loader::format::{parse_node, parse_nodes};
use crate::loader::source::{resolve_reference, DocumentSource};
use crate::tree::NodeDocument;

pub(crate) struct IncludeExpander<'s, S: ?Sized> {
    source: &'s S,
    in_flight: Vec<String>,
}

impl<'s, S: DocumentSource + ?Sized> IncludeExpander<'s, S> {
    pub(crate) fn new(source: &'s S) -> Self {
        Self {
            source,
            in_flight: Vec::new(),
        }
    }

    /// Expand all includes in `node` and below. `base` is the URI of the
    /// document `node` was read from.
    pub(crate) fn expand<'a>(
        &'a mut self,
        node: &'a mut NodeDocument,
        base: Option<&'a Url>,
    ) -> BoxFuture<'a, Result<(), LoadError>> {
        Box::pin(async move {
            if let (Some(single), Some(_)) = (&node.include, &node.include_array) {
                return Err(conflict(single, "cannot be combined with include_array"));
            }

            if let Some(reference) = node.include.take() {
                check_no_local_content(node, &reference)?;
                let uri = resolve_reference(base, &reference)?;
                self.enter(&uri)?;

                let text = self.source.fetch(&uri).await?;
                let included = parse_node(&text, uri.as_str())?;
                tracing::debug!(include = %uri, "Expanding include");
                replace_content(node, included);

                // The replacement may itself be an include.
                self.expand(node, Some(&uri)).await?;
                self.in_flight.pop();
                return Ok(());
            }

            if let Some(reference) = node.include_array.take() {
                check_no_local_content(node, &reference)?;
                let uri = resolve_reference(base, &reference)?;
                self.enter(&uri)?;

                let text = self.source.fetch(&uri).await?;
                let mut children = parse_nodes(&text, uri.as_str())?;
                tracing::debug!(include_array = %uri, count = children.len(), "Expanding include_array");
                for child in children.iter_mut() {
                    self.expand(child, Some(&uri)).await?;
                }
                node.nodes = Some(children);
                self.in_flight.pop();
                return Ok(());
            }

            if let Some(children) = node.nodes.as_mut() {
                for child in children.iter_mut() {
                    self.expand(child, base).await?;
                }
            }
            Ok(())
        })
    }

    pub(crate) fn enter(&mut self, uri: &Url) -> Result<(), LoadError> {
        let id = uri.as_str();
        if self.in_flight.iter().any(|in_flight| in_flight == id) {
            let mut chain = self.in_flight.clone();
            chain.push(id.to_string());
            return Err(LoadError::RecursiveInclude {
                uri: id.to_string(),
                chain: chain.join(" -> "),
            });
        }
        self.in_flight.push(id.to_string());
        Ok(())
    }
}

fn conflict(reference: &str, reason: &str) -> LoadError {
    LoadError::IncludeConflict {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}

fn check_no_local_content(node: &NodeDocument, reference: &str) -> Result<(), LoadError> {
    if node.nodes.is_some() {
        return Err(conflict(reference, "cannot be combined with nodes"));
    }
    if node.parameters.is_some() {
        return Err(conflict(reference, "cannot be combined with parameters"));
    }
    if node.modified.is_some() {
        return Err(conflict(reference, "cannot be combined with modified"));
    }
    Ok(())
}

/// Overwrite a node's content with an included node. The including node
/// keeps its own match when the included document does not declare one.
fn replace_content(node: &mut NodeDocument, included: NodeDocument) {
    if included.match_.is_some() {
        node.match_ = included.match_;
    }
    node.nodes = included.nodes;
    node.parameters = included.parameters;
    node.modified = included.modified;
    if included.levels.is_some() {
        node.levels = included.levels;
    }
    node.include = included.include;
    node.include_array = included.include_array;
}
