//! Document parsing: JSON first, XML second.
//!
//! Both formats share the same structure. XML nests repeated elements in a
//! wrapper (`<nodes><node/>…</nodes>`, `<parameters><parameter/>…</parameters>`,
//! `<levels><level/>…</levels>`), which the private `Xml*` types mirror before
//! conversion into [`NodeDocument`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::loader::error::LoadError;
use crate::tree::{NodeDocument, ParameterDocument};

/// Parse a document holding a single node.
pub fn parse_node(text: &str, origin: &str) -> Result<NodeDocument, LoadError> {
    parse_with::<NodeDocument, XmlNode>(text, origin)
}

/// Parse a document holding an array of nodes (target of `include_array`).
pub fn parse_nodes(text: &str, origin: &str) -> Result<Vec<NodeDocument>, LoadError> {
    parse_with::<Vec<NodeDocument>, XmlNodes>(text, origin)
}

/// Try JSON, then XML. If both fail, report the error of the format the
/// input most likely was: XML when it starts with markup, JSON otherwise.
fn parse_with<T, X>(text: &str, origin: &str) -> Result<T, LoadError>
where
    T: DeserializeOwned,
    X: DeserializeOwned + Into<T>,
{
    let json_error = match serde_json::from_str::<T>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    let xml_error = match quick_xml::de::from_str::<X>(text) {
        Ok(value) => {
            tracing::debug!(origin = %origin, "Parsed configuration document as XML");
            return Ok(value.into());
        }
        Err(e) => e,
    };

    let message = if looks_like_markup(text) {
        format!("invalid XML: {}", xml_error)
    } else {
        format!("invalid JSON: {}", json_error)
    };
    Err(LoadError::Parse {
        origin: origin.to_string(),
        message,
    })
}

fn looks_like_markup(text: &str) -> bool {
    text.trim_start_matches('\u{feff}').trim_start().starts_with('<')
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlNode {
    #[serde(rename = "match", default)]
    match_: Option<String>,
    #[serde(default)]
    nodes: Option<XmlNodes>,
    #[serde(default)]
    parameters: Option<XmlParameters>,
    #[serde(default)]
    modified: Option<String>,
    #[serde(default)]
    levels: Option<XmlLevels>,
    #[serde(default)]
    include: Option<String>,
    #[serde(default)]
    include_array: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlNodes {
    #[serde(default)]
    node: Vec<XmlNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlParameters {
    #[serde(default)]
    parameter: Vec<XmlParameter>,
}

// An empty <value/> cannot be told apart from a missing one in XML, so a
// missing value reads as the empty string.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlParameter {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlLevels {
    #[serde(default)]
    level: Vec<String>,
}

impl From<XmlNode> for NodeDocument {
    fn from(xml: XmlNode) -> Self {
        NodeDocument {
            match_: xml.match_,
            nodes: xml.nodes.map(Into::into),
            parameters: xml.parameters.map(|p| {
                p.parameter
                    .into_iter()
                    .map(|p| ParameterDocument {
                        key: p.key,
                        value: Some(p.value),
                    })
                    .collect()
            }),
            modified: xml.modified,
            levels: xml.levels.map(|l| l.level),
            include: xml.include,
            include_array: xml.include_array,
        }
    }
}

impl From<XmlNodes> for Vec<NodeDocument> {
    fn from(xml: XmlNodes) -> Self {
        xml.node.into_iter().map(NodeDocument::from).collect()
    }
}
