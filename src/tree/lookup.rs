//! Direct node lookup by literal path.
//!
//! Unlike the matching engine, lookup performs no regex evaluation, no
//! case folding and no level-name mapping. It is used to inspect or export
//! raw configuration subtrees.

use crate::tree::node::{NodeRef, Tree};
use crate::tree::PATH_SEPARATOR;

impl Tree {
    /// Find the node at `path` (segments separated by `/`).
    ///
    /// An empty path (or `/`) yields the root. Returns `None` as soon as a
    /// segment has no child with exactly that match string.
    pub fn find_node(&self, path: &str) -> Option<NodeRef<'_>> {
        let trimmed = path.trim_matches(PATH_SEPARATOR);
        if trimmed.is_empty() {
            return Some(self.root());
        }
        trimmed
            .split(PATH_SEPARATOR)
            .try_fold(self.root(), |node, segment| node.child(segment))
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::node::{NodeId, TreeBuilder};

    fn tree() -> crate::tree::Tree {
        let mut builder = TreeBuilder::new().levels(["service", "model", "device"]);
        let traffic = builder.add_child(NodeId::ROOT, "traffic");
        let cheapo = builder.add_child(traffic, "cheapo");
        builder.add_child(cheapo, "device[0-9]*");
        builder.add_child(cheapo, "device123");
        builder.build()
    }

    #[test]
    fn test_empty_path_is_root() {
        let tree = tree();
        assert!(tree.find_node("").unwrap().is_root());
        assert!(tree.find_node("/").unwrap().is_root());
    }

    #[test]
    fn test_every_real_path_resolves() {
        let tree = tree();
        for node in tree.nodes().filter(|n| !n.is_root()) {
            let path = node.path();
            let found = tree.find_node(&path).unwrap();
            assert_eq!(found.id(), node.id());
            assert_eq!(found.match_str(), path.rsplit('/').next());
        }
    }

    #[test]
    fn test_lookup_is_literal() {
        let tree = tree();
        assert!(tree.find_node("traffic/cheapo/device123").is_some());
        assert!(tree.find_node("traffic/cheapo/device[0-9]*").is_some());
        // Neither regex nor case folding applies.
        assert!(tree.find_node("traffic/cheapo/device999").is_none());
        assert!(tree.find_node("Traffic").is_none());
        assert!(tree.find_node("traffic/unknown").is_none());
    }
}
