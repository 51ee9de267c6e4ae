//! Path flattening

use crate::tree::{IncludeTree, NodeId};

/// Flatten `nodes` and their descendants into dotted paths, pre-order
///
/// Each node contributes `base_path.property_path` (or just its property
/// path when `base_path` is empty), followed by the paths of its children.
pub fn flatten(tree: &IncludeTree, nodes: &[NodeId], base_path: &str) -> Vec<String> {
    let mut paths = Vec::new();
    flatten_into(tree, nodes, base_path, &mut paths);
    paths
}

fn flatten_into(tree: &IncludeTree, nodes: &[NodeId], base_path: &str, out: &mut Vec<String>) {
    for &id in nodes {
        let Some(node) = tree.node(id) else {
            continue;
        };

        let new_path = if base_path.is_empty() {
            node.property_path.clone()
        } else {
            format!("{}.{}", base_path, node.property_path)
        };

        out.push(new_path.clone());
        flatten_into(tree, &node.children, &new_path, out);
    }
}
