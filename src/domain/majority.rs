//! Majority-vote descent: the MRCA of the majority of targets.
//!
//! Starting at the root, each step compares the two children of the current
//! node by the number of targets below them (votes) and descends into the
//! child with more votes. Descent stops when the child left behind is a pure
//! branch, made only of targets; the answer is then the parent of the node
//! whose children were compared.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::DomainError;
use crate::domain::mrca::resolve_targets;
use crate::domain::tally::SubtreeTally;

/// Which child wins when both children have the same number of votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Continue into the first child.
    First,
    /// Continue into the second child.
    #[default]
    Second,
}

impl TieBreak {
    /// Orders `(first, second)` as `(winner, loser)` for equal votes.
    fn pick(self, first: NodeId, second: NodeId) -> (NodeId, NodeId) {
        match self {
            TieBreak::First => (first, second),
            TieBreak::Second => (second, first),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::First => write!(f, "first"),
            TieBreak::Second => write!(f, "second"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(TieBreak::First),
            "second" => Ok(TieBreak::Second),
            other => Err(format!("invalid tie break '{}': expected 'first' or 'second'", other)),
        }
    }
}

/// Returns the MRCA of the majority of `targets`.
///
/// Errors:
/// - `EmptyTargetSet`, `NameNotFound`, `EmptyTree` as for [`find_mrca`](crate::domain::find_mrca)
/// - `NonBinaryNode` when a visited node has neither zero nor two children
/// - `DescentPastLeaf` when the winning side is a leaf and nothing pure was left behind
/// - `NoValidAncestor` when the first comparison, at the root, already stops
#[instrument(level = "debug", skip(tree, targets), fields(targets = targets.len()))]
pub fn find_majority_mrca(
    tree: &TreeArena,
    targets: &BTreeSet<String>,
    tie_break: TieBreak,
) -> Result<NodeId, DomainError> {
    resolve_targets(tree, targets)?;
    let tally = SubtreeTally::compute(tree, targets);

    let mut current = tree.root().ok_or(DomainError::EmptyTree)?;
    let mut step = 0usize;
    loop {
        let (first, second) = tree
            .binary_children(current)?
            .ok_or(DomainError::DescentPastLeaf)?;
        let (first_votes, second_votes) = (tally.get(first).votes, tally.get(second).votes);

        let (winner, loser) = if first_votes > second_votes {
            (first, second)
        } else if second_votes > first_votes {
            (second, first)
        } else {
            tie_break.pick(first, second)
        };
        let lost = tally.get(loser);
        trace!(
            step,
            first_votes,
            second_votes,
            loser_votes = lost.votes,
            loser_leaves = lost.leaves,
            "voting step"
        );

        if lost.is_pure() {
            let result = tree.parent(current).ok_or(DomainError::NoValidAncestor)?;
            debug!(steps = step + 1, mrca = %tree.describe(result), "found mrca of target majority");
            return Ok(result);
        }
        current = winner;
        step += 1;
    }
}
