//! Immutable tree model.
//!
//! # Responsibilities
//! - Store nodes in an arena with parent/child indexes
//! - Compile each node's match as a case-insensitive regex once
//! - Provide cheap, copyable views (`NodeRef`) for traversal
//!
//! # Design Decisions
//! - `NodeRef` borrows the tree, so no reference counting per node
//! - A match that is not a valid regex only ever matches literally

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A key/value pair attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    key: String,
    value: String,
}

impl Parameter {
    /// Create a parameter. The key is trimmed.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into().trim().to_string(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct NodeRecord {
    name: Option<String>,
    folded: Option<String>,
    pattern: Option<Regex>,
    parent: Option<NodeId>,
    depth: usize,
    children: Vec<NodeId>,
    parameters: Option<Vec<Parameter>>,
    modified: Option<DateTime<Utc>>,
}

impl NodeRecord {
    fn new(name: Option<String>, parent: Option<NodeId>, depth: usize) -> Self {
        let folded = name.as_deref().map(str::to_lowercase);
        let pattern = name.as_deref().and_then(compile_pattern);
        Self {
            name,
            folded,
            pattern,
            parent,
            depth,
            children: Vec::new(),
            parameters: None,
            modified: None,
        }
    }
}

/// Whole-term, case-insensitive regex for a node match.
fn compile_pattern(name: &str) -> Option<Regex> {
    RegexBuilder::new(&format!("^(?:{})$", name))
        .case_insensitive(true)
        .build()
        .ok()
}

/// An immutable configuration tree.
#[derive(Debug)]
pub struct Tree {
    records: Vec<NodeRecord>,
    levels: Option<Vec<String>>,
    depth: usize,
}

impl Tree {
    /// A tree consisting of a bare root: no levels, children or parameters.
    pub fn empty() -> Self {
        TreeBuilder::new().build()
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(NodeId::ROOT)
    }

    /// Get a node by id.
    ///
    /// Ids are only ever handed out by this tree, so they are always in range.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// All nodes, parents before their children.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.records.len()).map(move |i| self.node(NodeId(i)))
    }

    /// Level names declared on the root, in canonical order.
    pub fn levels(&self) -> &[String] {
        self.levels.as_deref().unwrap_or_default()
    }

    /// True if the root declared a `levels` list (possibly empty).
    pub fn has_levels(&self) -> bool {
        self.levels.is_some()
    }

    /// Deepest node depth (the root is depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.len() == 1
    }

    fn record(&self, id: NodeId) -> &NodeRecord {
        &self.records[id.0]
    }
}

/// Incrementally builds a [`Tree`].
///
/// The builder performs no validation; callers (the loader, tests) are
/// expected to hand it a structure that already satisfies the invariants.
#[derive(Debug)]
pub struct TreeBuilder {
    records: Vec<NodeRecord>,
    levels: Option<Vec<String>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            records: vec![NodeRecord::new(None, None, 0)],
            levels: None,
        }
    }

    /// Declare the level names on the root.
    pub fn levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the root's match string (normally absent).
    pub fn root_match(&mut self, name: impl Into<String>) {
        let name = name.into();
        let root = &mut self.records[0];
        root.folded = Some(name.to_lowercase());
        root.pattern = compile_pattern(&name);
        root.name = Some(name);
    }

    /// Append a child node and return its id.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.records.len());
        let depth = self.records[parent.0].depth + 1;
        self.records.push(NodeRecord::new(Some(name.into()), Some(parent), depth));
        self.records[parent.0].children.push(id);
        id
    }

    pub fn set_parameters(&mut self, id: NodeId, parameters: Vec<Parameter>) {
        self.records[id.0].parameters = Some(parameters);
    }

    pub fn set_modified(&mut self, id: NodeId, modified: DateTime<Utc>) {
        self.records[id.0].modified = Some(modified);
    }

    pub fn build(self) -> Tree {
        let depth = self.records.iter().map(|r| r.depth).max().unwrap_or(0);
        Tree {
            records: self.records,
            levels: self.levels,
            depth,
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// The literal or regex string of this node; `None` for the root.
    pub fn match_str(&self) -> Option<&'t str> {
        self.tree.record(self.id).name.as_deref()
    }

    pub fn depth(&self) -> usize {
        self.tree.record(self.id).depth
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.tree
            .record(self.id)
            .parent
            .map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        tree.record(self.id)
            .children
            .iter()
            .map(move |&id| tree.node(id))
    }

    pub fn has_children(&self) -> bool {
        !self.tree.record(self.id).children.is_empty()
    }

    /// Child whose match equals `name` exactly (case-sensitive, no regex).
    pub fn child(&self, name: &str) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.match_str() == Some(name))
    }

    pub fn parameters(&self) -> Option<&'t [Parameter]> {
        self.tree.record(self.id).parameters.as_deref()
    }

    /// The timestamp declared on this node itself, not inherited.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.tree.record(self.id).modified
    }

    /// Levels are only ever declared on the root.
    pub fn levels(&self) -> Option<&'t [String]> {
        if self.is_root() {
            self.tree.levels.as_deref()
        } else {
            None
        }
    }

    /// Iterate from this node up to and including the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        std::iter::successors(Some(*self), |n| n.parent())
    }

    /// Match strings from the first level down to this node.
    pub fn path_segments(&self) -> Vec<&'t str> {
        let mut segments: Vec<&'t str> = self
            .ancestors()
            .filter(|n| !n.is_root())
            .filter_map(|n| n.match_str())
            .collect();
        segments.reverse();
        segments
    }

    /// Slash-joined path from the root; empty for the root itself.
    pub fn path(&self) -> String {
        self.path_segments().join("/")
    }

    /// Case-insensitive literal comparison against a search term.
    pub fn matches_literal(&self, term: &str) -> bool {
        match &self.tree.record(self.id).folded {
            Some(folded) => *folded == term.to_lowercase(),
            None => false,
        }
    }

    /// Case-insensitive whole-term regex comparison against a search term.
    pub fn matches_pattern(&self, term: &str) -> bool {
        match &self.tree.record(self.id).pattern {
            Some(pattern) => pattern.is_match(term),
            None => false,
        }
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("match", &self.match_str())
            .finish()
    }
}
