//! Tree validation.
//!
//! # Responsibilities
//! - Check node names, sibling uniqueness and parameters
//! - Check that every include has been expanded
//! - Check `modified` timestamps against the accepted profile
//! - Check the root's levels against the depth of the tree
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: &NodeDocument → Result<(), Vec<ValidationError>>
//! - Runs after include expansion and before the tree is frozen

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::loader::error::ValidationError;
use crate::tree::{invalid_name_reason, NodeDocument};

/// Parse a `modified` value: `2016-01-02T12:34:56Z` or with a numeric
/// offset (`2016-01-02T12:34:56+01:00`). Whole seconds only, so every
/// accepted value survives export unchanged.
pub fn parse_modified(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    match value.strip_suffix('Z') {
        Some(local) => NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc()),
        None => DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%:z")
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Validate a fully expanded document tree.
pub fn validate_document(root: &NodeDocument) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let depth = validate_node(root, "/", 0, &mut errors);
    validate_levels(root, depth, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates `node` and its subtree. Returns the deepest depth found.
fn validate_node(
    node: &NodeDocument,
    location: &str,
    depth: usize,
    errors: &mut Vec<ValidationError>,
) -> usize {
    let is_root = depth == 0;

    if node.has_include() {
        errors.push(ValidationError::UnresolvedInclude {
            location: location.to_string(),
        });
    }

    if !is_root && node.levels.is_some() {
        errors.push(ValidationError::LevelsOnNonRoot {
            location: location.to_string(),
        });
    }

    for parameter in node.parameters.iter().flatten() {
        match parameter.key.as_deref().map(str::trim) {
            None | Some("") => errors.push(ValidationError::MissingKey {
                location: location.to_string(),
            }),
            Some(key) => {
                if parameter.value.is_none() {
                    errors.push(ValidationError::MissingValue {
                        location: location.to_string(),
                        key: key.to_string(),
                    });
                }
            }
        }
    }

    if let Some(modified) = &node.modified {
        if parse_modified(modified).is_none() {
            errors.push(ValidationError::InvalidModified {
                location: location.to_string(),
                value: modified.clone(),
            });
        }
    }

    let mut deepest = depth;
    let mut seen = HashSet::new();
    for child in node.nodes.iter().flatten() {
        let Some(name) = child.match_.as_deref() else {
            errors.push(ValidationError::MissingMatch {
                location: location.to_string(),
            });
            continue;
        };

        let child_location = if is_root {
            name.to_string()
        } else {
            format!("{}/{}", location, name)
        };

        if let Some(reason) = invalid_name_reason(name) {
            errors.push(ValidationError::InvalidMatch {
                location: child_location.clone(),
                reason,
            });
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateMatch {
                location: location.to_string(),
                name: name.to_string(),
            });
        }

        deepest = deepest.max(validate_node(child, &child_location, depth + 1, errors));
    }
    deepest
}

fn validate_levels(root: &NodeDocument, depth: usize, errors: &mut Vec<ValidationError>) {
    let Some(levels) = &root.levels else {
        if root.nodes.as_ref().is_some_and(|nodes| !nodes.is_empty()) {
            errors.push(ValidationError::MissingLevels);
        }
        return;
    };

    let mut seen = HashSet::new();
    for name in levels {
        if let Some(reason) = invalid_name_reason(name) {
            errors.push(ValidationError::InvalidLevel {
                name: name.clone(),
                reason,
            });
        }
        if !seen.insert(name.to_lowercase()) {
            errors.push(ValidationError::DuplicateLevel { name: name.clone() });
        }
    }

    if levels.len() < depth {
        errors.push(ValidationError::TooFewLevels {
            depth,
            declared: levels.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ParameterDocument;

    fn doc(json: &str) -> NodeDocument {
        serde_json::from_str(json).unwrap()
    }

    fn errors(json: &str) -> Vec<ValidationError> {
        validate_document(&doc(json)).unwrap_err()
    }

    #[test]
    fn test_valid_document() {
        let valid = doc(r#"{
            "levels": ["service", "model"],
            "modified": "2016-01-02T12:34:56Z",
            "nodes": [
                {"match": "traffic", "parameters": [{"key": "a", "value": ""}],
                 "nodes": [{"match": "cheapo"}, {"match": "Cheapo"}]}
            ]
        }"#);
        assert!(validate_document(&valid).is_ok());
    }

    #[test]
    fn test_childless_root_needs_no_levels() {
        assert!(validate_document(&NodeDocument::default()).is_ok());
        let with_params = NodeDocument {
            parameters: Some(vec![ParameterDocument::new("k", "v")]),
            ..NodeDocument::default()
        };
        assert!(validate_document(&with_params).is_ok());
    }

    #[test]
    fn test_missing_levels() {
        assert_eq!(errors(r#"{"nodes": [{"match": "x"}]}"#), vec![ValidationError::MissingLevels]);
    }

    #[test]
    fn test_too_few_levels() {
        let errs = errors(r#"{"levels": ["a"], "nodes": [{"match": "x", "nodes": [{"match": "y"}]}]}"#);
        assert_eq!(errs, vec![ValidationError::TooFewLevels { depth: 2, declared: 1 }]);
    }

    #[test]
    fn test_invalid_and_duplicate_levels() {
        let errs = errors(r#"{"levels": ["a", "A", "", "x/y", "search"]}"#);
        assert_eq!(errs.len(), 4);
        assert!(errs.contains(&ValidationError::DuplicateLevel { name: "A".into() }));
    }

    #[test]
    fn test_node_names() {
        let errs = errors(r#"{"levels": ["a"], "nodes": [{}, {"match": ""}, {"match": "a,b"}, {"match": "x"}, {"match": "x"}]}"#);
        assert!(errs.contains(&ValidationError::MissingMatch { location: "/".into() }));
        assert!(errs.contains(&ValidationError::DuplicateMatch { location: "/".into(), name: "x".into() }));
        assert_eq!(
            errs.iter().filter(|e| matches!(e, ValidationError::InvalidMatch { .. })).count(),
            2
        );
    }

    #[test]
    fn test_levels_only_on_root() {
        let errs = errors(r#"{"levels": ["a", "b"], "nodes": [{"match": "x", "levels": ["b"]}]}"#);
        assert_eq!(errs, vec![ValidationError::LevelsOnNonRoot { location: "x".into() }]);
    }

    #[test]
    fn test_parameters() {
        let errs = errors(r#"{"levels": ["a"], "nodes": [{"match": "x", "parameters": [{"value": "v"}, {"key": "  "}, {"key": "k"}]}]}"#);
        assert_eq!(
            errs,
            vec![
                ValidationError::MissingKey { location: "x".into() },
                ValidationError::MissingKey { location: "x".into() },
                ValidationError::MissingValue { location: "x".into(), key: "k".into() },
            ]
        );
    }

    #[test]
    fn test_modified_format() {
        let errs = errors(r#"{"levels": ["a"], "nodes": [{"match": "x", "nodes": [], "modified": "02-01-2016"}]}"#);
        assert_eq!(
            errs,
            vec![ValidationError::InvalidModified { location: "x".into(), value: "02-01-2016".into() }]
        );
        assert!(errs[0].to_string().contains("yyyy-MM-ddTHH:mm:ssZ"));
    }

    #[test]
    fn test_unresolved_include() {
        let errs = errors(r#"{"levels": ["a"], "nodes": [{"match": "x", "include": "y.json"}]}"#);
        assert_eq!(errs, vec![ValidationError::UnresolvedInclude { location: "x".into() }]);
    }

    #[test]
    fn test_parse_modified() {
        assert!(parse_modified("2016-01-02T12:34:56Z").is_some());
        assert!(parse_modified("2016-01-02T12:34:56+02:00").is_some());
        assert!(parse_modified("2016-01-02 12:34:56").is_none());
        assert!(parse_modified("2016-01-02T12:34:56").is_none());
        assert!(parse_modified("2016-01-02T12:34:56.789Z").is_none());
        assert!(parse_modified("2016-01-02T12:34:56.123+02:00").is_none());
    }
}
