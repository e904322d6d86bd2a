use glam::Mat4;
use smallvec::SmallVec;

use crate::import::ImportedNode;

/// Index of a node inside a [`Hierarchy`].
pub type NodeIndex = usize;

#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub name: String,
    /// Bind transform relative to the parent.
    pub transformation: Mat4,
    pub children: SmallVec<[NodeIndex; 4]>,
}

/// Node tree stored as an arena. The root is always index 0 unless the
/// hierarchy is empty.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Copies an imported node tree, parents before children.
    #[must_use]
    pub fn read_hierarchy_data(source: &ImportedNode) -> Self {
        let mut hierarchy = Self::default();
        hierarchy.push_subtree(source);
        hierarchy
    }

    fn push_subtree(&mut self, source: &ImportedNode) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(HierarchyNode {
            name: source.name.clone(),
            transformation: source.transform,
            children: SmallVec::new(),
        });

        for child in &source.children {
            let child_index = self.push_subtree(child);
            self.nodes[index].children.push(child_index);
        }
        index
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&HierarchyNode> {
        self.nodes.first()
    }

    #[inline]
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&HierarchyNode> {
        self.nodes.get(index)
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.nodes.iter().position(|node| node.name == name)
    }
}
