//! Include tree
//!
//! Nodes live in an arena owned by [`IncludeTree`]. A node owns its children
//! through their ids; the parent link is a lookup only.

use ctxdump_core::TypeHandle;

/// Identity of a node within its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena position
    pub fn index(self) -> usize {
        self.0
    }
}

/// One navigation property in the traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeNode {
    /// Property name, not prefixed by its ancestors
    pub property_path: String,

    /// Declared value type of the property
    pub declared_type: TypeHandle,

    /// Owning node (`None` for top-level nodes)
    pub parent: Option<NodeId>,

    /// Child nodes in property order
    pub children: Vec<NodeId>,
}

/// Arena of include nodes plus the top-level node list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeTree {
    nodes: Vec<IncludeNode>,
    roots: Vec<NodeId>,
}

impl IncludeTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with no children
    pub fn add_node(&mut self, property_path: impl Into<String>, declared_type: TypeHandle, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(IncludeNode {
            property_path: property_path.into(),
            declared_type,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Replace a node's children
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.children = children;
        }
    }

    /// Append top-level nodes
    pub fn extend_roots(&mut self, roots: impl IntoIterator<Item = NodeId>) {
        self.roots.extend(roots);
    }

    /// Top-level nodes
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Get a node
    pub fn node(&self, id: NodeId) -> Option<&IncludeNode> {
        self.nodes.get(id.0)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of ancestors of a node (top-level nodes have depth 0)
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).and_then(|n| n.parent);
        }
        depth
    }

    /// Dotted path from the top level down to a node
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            segments.push(node.property_path.as_str());
            current = node.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Node ids reachable from the roots, pre-order
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Flatten the whole tree into dotted paths
    pub fn paths(&self) -> Vec<String> {
        crate::flatten::flatten(self, &self.roots, "")
    }
}
