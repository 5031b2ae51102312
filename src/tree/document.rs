//! Wire format of a configuration (sub)tree.
//!
//! The same shape is used when reading configuration documents and when
//! exporting a subtree over HTTP. Optional fields stay optional here; the
//! loader decides which combinations are legal.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::tree::node::NodeRef;

/// One node as it appears in a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDocument {
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeDocument>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterDocument>>,

    /// ISO-8601 timestamp, e.g. `2016-01-02T12:34:56Z`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,

    /// Only legal on the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<String>>,

    /// URI of a single node replacing this node's content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    /// URI of an array of nodes used as this node's children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_array: Option<String>,
}

/// A key/value pair as it appears in a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDocument {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub value: Option<String>,
}

impl ParameterDocument {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

impl NodeDocument {
    pub fn has_include(&self) -> bool {
        self.include.is_some() || self.include_array.is_some()
    }

    /// Export a node and its whole subtree. Levels are only emitted for the root.
    pub fn from_node(node: NodeRef<'_>) -> Self {
        let nodes: Vec<NodeDocument> = node.children().map(NodeDocument::from_node).collect();
        Self {
            match_: node.match_str().map(str::to_string),
            nodes: if nodes.is_empty() { None } else { Some(nodes) },
            parameters: node.parameters().map(|params| {
                params
                    .iter()
                    .map(|p| ParameterDocument::new(p.key(), p.value()))
                    .collect()
            }),
            modified: node
                .modified()
                .map(|m| m.to_rfc3339_opts(SecondsFormat::Secs, true)),
            levels: node.levels().map(<[String]>::to_vec),
            include: None,
            include_array: None,
        }
    }
}
