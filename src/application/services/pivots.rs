//! Pivot service
//!
//! Loads the tree and target list and computes both pivots: the MRCA of all
//! targets and the MRCA of the majority of targets.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{find_majority_mrca, find_mrca, NodeId, TargetSet, TieBreak, TreeArena};
use crate::infrastructure::traits::FileSystem;

/// Both pivots of a target set, with the leaf counts below them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivots {
    /// Number of distinct target names
    pub target_count: usize,
    /// Number of leaves in the whole tree
    pub total_leaves: usize,
    /// MRCA of all targets
    pub mrca_all: NodeId,
    pub mrca_all_leaves: usize,
    /// MRCA of the majority of targets
    pub mrca_majority: NodeId,
    pub mrca_majority_leaves: usize,
}

/// Service computing pivots from tree and target files.
pub struct PivotService {
    fs: Arc<dyn FileSystem>,
}

impl PivotService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a Newick tree file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_tree(&self, path: &Path) -> ApplicationResult<TreeArena> {
        let content = self.read_input(path, "read tree")?;
        let tree: TreeArena = content.parse()?;
        debug!(leaves = tree.leaf_count(), depth = tree.depth(), "loaded tree");
        Ok(tree)
    }

    /// Read a newline-separated target list.
    #[instrument(level = "debug", skip(self))]
    pub fn load_targets(&self, path: &Path) -> ApplicationResult<TargetSet> {
        let content = self.read_input(path, "read targets")?;
        let targets = TargetSet::parse(&content);
        debug!(targets = targets.len(), "loaded targets");
        Ok(targets)
    }

    fn read_input(&self, path: &Path, action: &str) -> ApplicationResult<String> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        self.fs.read_to_string(path).with_path_context(action, path)
    }

    /// Compute both pivots; any domain error aborts the whole computation.
    #[instrument(level = "debug", skip(self, tree, targets))]
    pub fn find_pivots(
        &self,
        tree: &TreeArena,
        targets: &TargetSet,
        tie_break: TieBreak,
    ) -> ApplicationResult<Pivots> {
        let mrca_all = find_mrca(tree, targets)?;
        let mrca_majority = find_majority_mrca(tree, targets, tie_break)?;

        let pivots = Pivots {
            target_count: targets.len(),
            total_leaves: tree.leaf_count(),
            mrca_all,
            mrca_all_leaves: tree.leaves_under(mrca_all).count(),
            mrca_majority,
            mrca_majority_leaves: tree.leaves_under(mrca_majority).count(),
        };
        info!(
            targets = pivots.target_count,
            mrca_all_leaves = pivots.mrca_all_leaves,
            mrca_majority_leaves = pivots.mrca_majority_leaves,
            "pivots computed"
        );
        Ok(pivots)
    }
}
