//! Arena-backed phylogenetic tree.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;

/// Stable identity of a node within one [`TreeArena`].
///
/// Indices of cut nodes are invalidated by the arena generation, so a stale
/// `NodeId` never aliases a newer node.
pub type NodeId = Index;

/// Data payload for tree nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    /// Leaf label or internal node label, None when the input had none
    pub name: Option<String>,
    /// Length of the branch leading to this node
    pub branch_length: Option<f64>,
}

impl NodeData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            branch_length: None,
        }
    }

    pub fn with_branch_length(mut self, length: f64) -> Self {
        self.branch_length = Some(length);
        self
    }
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted tree stored in a generational arena.
///
/// Construction does not enforce bifurcation; the voting descent reports
/// nodes that are not binary when it reaches them.
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<NodeId>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a node below `parent`, or as the root when `parent` is None.
    #[instrument(level = "debug", skip(self, data))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    /// Like [`get_node`](Self::get_node) but fails with `UnknownNode`.
    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, idx: NodeId) -> Result<&TreeNode, DomainError> {
        self.arena.get(idx).ok_or(DomainError::UnknownNode)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes, internal ones included.
    #[instrument(level = "trace", skip(self))]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn name(&self, idx: NodeId) -> Option<&str> {
        self.arena.get(idx).and_then(|n| n.data.name.as_deref())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.arena.get(idx).and_then(|n| n.parent)
    }

    /// Children in input order; empty for leaves and unknown nodes.
    #[instrument(level = "trace", skip(self))]
    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.arena
            .get(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The two children of a bifurcating node, None for a leaf.
    #[instrument(level = "trace", skip(self))]
    pub fn binary_children(&self, idx: NodeId) -> Result<Option<(NodeId, NodeId)>, DomainError> {
        match self.node(idx)?.children.as_slice() {
            [] => Ok(None),
            [first, second] => Ok(Some((*first, *second))),
            other => Err(DomainError::NonBinaryNode {
                children: other.len(),
            }),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn is_leaf(&self, idx: NodeId) -> bool {
        self.arena.get(idx).is_some_and(TreeNode::is_leaf)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `idx`.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants(&self, idx: NodeId) -> TreeIterator {
        TreeIterator::new(self, Some(idx))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Leaves below `idx` (or `idx` itself if it is a leaf), left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn leaves_under(&self, idx: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(idx)
            .filter(|(_, node)| node.is_leaf())
            .map(|(leaf_idx, _)| leaf_idx)
    }

    /// Number of leaves in the whole tree.
    #[instrument(level = "trace", skip(self))]
    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|(_, node)| node.is_leaf()).count()
    }

    /// Height of the tree in nodes; a lone root has depth 1.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in self.children(idx) {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    /// Names of all named leaves in left-to-right order.
    #[instrument(level = "trace", skip(self))]
    pub fn leaf_names(&self) -> Vec<String> {
        self.root
            .into_iter()
            .flat_map(|root| self.leaves_under(root))
            .filter_map(|idx| self.name(idx).map(str::to_string))
            .collect()
    }

    /// Maps leaf names to nodes; with duplicate names the leftmost leaf wins.
    #[instrument(level = "trace", skip(self))]
    pub fn leaf_index(&self) -> HashMap<&str, NodeId> {
        let mut index = HashMap::new();
        if let Some(root) = self.root {
            for leaf in self.leaves_under(root) {
                if let Some(name) = self.name(leaf) {
                    index.entry(name).or_insert(leaf);
                }
            }
        }
        index
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find_leaf(&self, name: &str) -> Option<NodeId> {
        let root = self.root?;
        self.leaves_under(root).find(|&idx| self.name(idx) == Some(name))
    }

    /// Nodes from the root down to `idx`, both included.
    #[instrument(level = "trace", skip(self))]
    pub fn path_from_root(&self, idx: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.arena.get(idx).map(|_| idx);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.parent(current);
        }
        path.reverse();
        path
    }

    #[instrument(level = "trace", skip(self))]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, idx: NodeId) -> bool {
        let mut cursor = self.arena.get(idx).map(|_| idx);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Human-readable label: the node name, or the span of its leaves.
    #[instrument(level = "trace", skip(self))]
    pub fn describe(&self, idx: NodeId) -> String {
        if let Some(name) = self.name(idx) {
            return name.to_string();
        }
        let names: Vec<&str> = self
            .leaves_under(idx)
            .map(|leaf| self.name(leaf).unwrap_or("?"))
            .collect();
        match names.as_slice() {
            [] => "<unknown node>".to_string(),
            [only] => (*only).to_string(),
            [first, .., last] => format!("<clade of {} leaves: {} .. {}>", names.len(), first, last),
        }
    }

    /// Removes the clade rooted at `idx` and returns how many leaves it held.
    ///
    /// The parent left with a single child is spliced out, its child taking
    /// its place with the two branch lengths summed, so the tree stays binary.
    #[instrument(level = "debug", skip(self))]
    pub fn cut_clade(&mut self, idx: NodeId) -> Result<usize, DomainError> {
        let parent_idx = self.node(idx)?.parent.ok_or(DomainError::CannotCutRoot)?;

        let subtree: Vec<(NodeId, bool)> = self
            .descendants(idx)
            .map(|(node_idx, node)| (node_idx, node.is_leaf()))
            .collect();
        let removed_leaves = subtree.iter().filter(|(_, leaf)| *leaf).count();
        for (node_idx, _) in subtree {
            self.arena.remove(node_idx);
        }

        if let Some(parent) = self.arena.get_mut(parent_idx) {
            parent.children.retain(|&child| child != idx);
        }
        self.splice_unary(parent_idx);

        debug!(removed_leaves, remaining = self.leaf_count(), "clade cut");
        Ok(removed_leaves)
    }

    fn splice_unary(&mut self, idx: NodeId) {
        let (grandparent, child, length) = match self.arena.get(idx) {
            Some(node) if node.children.len() == 1 => {
                (node.parent, node.children[0], node.data.branch_length)
            }
            _ => return,
        };
        self.arena.remove(idx);

        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = grandparent;
            child_node.data.branch_length = match (child_node.data.branch_length, length) {
                (Some(a), Some(b)) => Some(a + b),
                (a, b) => a.or(b),
            };
        }

        match grandparent {
            Some(g) => {
                if let Some(grandparent_node) = self.arena.get_mut(g) {
                    for slot in grandparent_node.children.iter_mut().filter(|c| **c == idx) {
                        *slot = child;
                    }
                }
            }
            None => self.root = Some(child),
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<NodeId>) -> Self {
        Self {
            arena,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      root
    //      /  \
    //     x    C
    //    / \
    //   A   B
    fn sample() -> (TreeArena, [NodeId; 5]) {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(NodeData::default(), None);
        let x = tree.insert_node(NodeData::default().with_branch_length(1.0), Some(root));
        let c = tree.insert_node(NodeData::named("C"), Some(root));
        let a = tree.insert_node(NodeData::named("A"), Some(x));
        let b = tree.insert_node(NodeData::named("B").with_branch_length(0.5), Some(x));
        (tree, [root, x, c, a, b])
    }

    #[test]
    fn test_structure_accessors() {
        let (tree, [root, x, c, a, b]) = sample();
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.children(root), &[x, c]);
        assert_eq!(tree.parent(a), Some(x));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.binary_children(x).unwrap(), Some((a, b)));
        assert_eq!(tree.binary_children(c).unwrap(), None);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_leaves_under_is_left_to_right() {
        let (tree, [root, x, c, a, b]) = sample();
        assert_eq!(tree.leaves_under(root).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tree.leaves_under(x).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.leaves_under(c).collect::<Vec<_>>(), vec![c]);
        assert_eq!(tree.leaf_names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_preorder_visits_parent_first() {
        let (tree, [root, x, c, a, b]) = sample();
        let order: Vec<NodeId> = tree.iter().map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![root, x, a, b, c]);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_postorder_visits_children_first() {
        let (tree, [root, x, c, a, b]) = sample();
        let order: Vec<NodeId> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![a, b, x, c, root]);
    }

    #[test]
    fn test_ancestry() {
        let (tree, [root, x, c, a, _]) = sample();
        assert_eq!(tree.path_from_root(a), vec![root, x, a]);
        assert!(tree.is_ancestor_or_self(root, a));
        assert!(tree.is_ancestor_or_self(a, a));
        assert!(!tree.is_ancestor_or_self(c, a));
        assert!(!tree.is_ancestor_or_self(a, x));
    }

    #[test]
    fn test_describe() {
        let (tree, [root, x, c, _, _]) = sample();
        assert_eq!(tree.describe(c), "C");
        assert_eq!(tree.describe(x), "<clade of 2 leaves: A .. B>");
        assert_eq!(tree.describe(root), "<clade of 3 leaves: A .. C>");
    }

    #[test]
    fn test_binary_children_rejects_unary_node() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(NodeData::default(), None);
        tree.insert_node(NodeData::named("A"), Some(root));
        assert_eq!(
            tree.binary_children(root),
            Err(DomainError::NonBinaryNode { children: 1 })
        );
    }

    #[test]
    fn test_cut_clade_splices_unary_parent() {
        let (mut tree, [root, x, c, a, b]) = sample();
        let removed = tree.cut_clade(a).unwrap();

        assert_eq!(removed, 1);
        assert!(tree.get_node(a).is_none());
        assert!(tree.get_node(x).is_none());
        assert_eq!(tree.children(root), &[b, c]);
        assert_eq!(tree.parent(b), Some(root));
        assert_eq!(tree.get_node(b).unwrap().data.branch_length, Some(1.5));
        assert_eq!(tree.leaf_names(), vec!["B", "C"]);
    }

    #[test]
    fn test_cut_clade_promotes_new_root() {
        let (mut tree, [_, x, c, a, _]) = sample();
        assert_eq!(tree.cut_clade(c).unwrap(), 1);
        assert_eq!(tree.root(), Some(x));
        assert_eq!(tree.parent(x), None);
        assert_eq!(tree.parent(a), Some(x));
    }

    #[test]
    fn test_cut_root_is_rejected() {
        let (mut tree, [root, ..]) = sample();
        assert_eq!(tree.cut_clade(root), Err(DomainError::CannotCutRoot));
    }
}
