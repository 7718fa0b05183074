//! Per-node leaf and target counts, computed in one post-order pass.

use std::collections::{BTreeSet, HashMap};

use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};

/// Leaf count and vote count (target leaves) of a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub leaves: usize,
    pub votes: usize,
}

impl Tally {
    /// A branch whose every leaf is a target.
    pub fn is_pure(&self) -> bool {
        self.votes == self.leaves
    }
}

/// Cached tallies for every node of a tree.
#[derive(Debug)]
pub struct SubtreeTally {
    tallies: HashMap<NodeId, Tally>,
}

impl SubtreeTally {
    #[instrument(level = "debug", skip_all, fields(targets = targets.len()))]
    pub fn compute(tree: &TreeArena, targets: &BTreeSet<String>) -> Self {
        let mut tallies: HashMap<NodeId, Tally> = HashMap::with_capacity(tree.len());

        for (idx, node) in tree.iter_postorder() {
            let tally = if node.is_leaf() {
                let is_target = node
                    .data
                    .name
                    .as_ref()
                    .is_some_and(|name| targets.contains(name));
                Tally {
                    leaves: 1,
                    votes: usize::from(is_target),
                }
            } else {
                node.children
                    .iter()
                    .filter_map(|child| tallies.get(child))
                    .fold(Tally::default(), |acc, t| Tally {
                        leaves: acc.leaves + t.leaves,
                        votes: acc.votes + t.votes,
                    })
            };
            tallies.insert(idx, tally);
        }

        Self { tallies }
    }

    pub fn get(&self, idx: NodeId) -> Tally {
        self.tallies.get(&idx).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies_sum_over_subtrees() {
        let tree: TreeArena = "((A,B),(C,(D,E)));".parse().unwrap();
        let targets: BTreeSet<String> = ["A", "B", "D"].iter().map(|s| s.to_string()).collect();
        let tally = SubtreeTally::compute(&tree, &targets);

        let root = tree.root().unwrap();
        assert_eq!(tally.get(root), Tally { leaves: 5, votes: 3 });

        let (ab, cde) = tree.binary_children(root).unwrap().unwrap();
        assert_eq!(tally.get(ab), Tally { leaves: 2, votes: 2 });
        assert!(tally.get(ab).is_pure());
        assert_eq!(tally.get(cde), Tally { leaves: 3, votes: 1 });
        assert!(!tally.get(cde).is_pure());
    }
}
