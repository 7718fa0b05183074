//! Most-recent common ancestor of a set of leaves.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::DomainError;

/// Looks up the leaf of every target name.
///
/// Fails on an empty tree, an empty target set, or the first name (in set
/// order) that matches no leaf.
pub(crate) fn resolve_targets(
    tree: &TreeArena,
    targets: &BTreeSet<String>,
) -> Result<Vec<NodeId>, DomainError> {
    if tree.is_empty() {
        return Err(DomainError::EmptyTree);
    }
    if targets.is_empty() {
        return Err(DomainError::EmptyTargetSet);
    }
    let index = tree.leaf_index();
    targets
        .iter()
        .map(|name| {
            index
                .get(name.as_str())
                .copied()
                .ok_or_else(|| DomainError::NameNotFound(name.clone()))
        })
        .collect()
}

/// Returns the lowest node whose subtree holds every leaf named in `targets`.
///
/// This is the last node shared by all root-to-target paths.
#[instrument(level = "debug", skip_all, fields(targets = targets.len()))]
pub fn find_mrca(tree: &TreeArena, targets: &BTreeSet<String>) -> Result<NodeId, DomainError> {
    let leaves = resolve_targets(tree, targets)?;

    let mut paths = leaves.into_iter().map(|leaf| tree.path_from_root(leaf));
    let mut common = paths.next().ok_or(DomainError::EmptyTargetSet)?;
    for path in paths {
        let shared = common
            .iter()
            .zip(path.iter())
            .take_while(|(a, b)| a == b)
            .count();
        common.truncate(shared);
    }

    let mrca = common.last().copied().ok_or(DomainError::EmptyTree)?;
    debug!(mrca = %tree.describe(mrca), depth = common.len(), "found mrca of all targets");
    Ok(mrca)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mrca_of_sibling_leaves_is_their_parent() {
        let tree: TreeArena = "((A,B)ab,(C,D)cd)root;".parse().unwrap();
        let mrca = find_mrca(&tree, &names(&["A", "B"])).unwrap();
        assert_eq!(tree.name(mrca), Some("ab"));
    }

    #[test]
    fn test_mrca_rejects_empty_tree() {
        let tree = TreeArena::new();
        assert_eq!(find_mrca(&tree, &names(&["A"])), Err(DomainError::EmptyTree));
    }
}
