//! Neighbor extraction service
//!
//! Cuts unwanted clades and collects the names of the remaining leaves.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{find_mrca, TargetSet, TreeArena};
use crate::infrastructure::traits::FileSystem;

/// Result of cutting clades from a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Named leaves left after all cuts, left to right
    pub neighbors: Vec<String>,
    /// Leaves before any cut
    pub total_leaves: usize,
    /// Leaves removed by the cuts
    pub removed_leaves: usize,
}

/// Service applying clade cuts and writing the neighbor list.
pub struct ExtractService {
    fs: Arc<dyn FileSystem>,
}

impl ExtractService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Cut, in order, the clade at the MRCA of each name group.
    ///
    /// Names must still be present when their cut is applied: a group naming
    /// a leaf removed by an earlier cut fails with `NameNotFound`.
    #[instrument(level = "debug", skip(self, tree, cuts), fields(cuts = cuts.len()))]
    pub fn extract_neighbors(&self, tree: &mut TreeArena, cuts: &[TargetSet]) -> ApplicationResult<Extraction> {
        let total_leaves = tree.leaf_count();
        let mut removed_leaves = 0;

        for cut in cuts {
            let clade = find_mrca(tree, cut)?;
            debug!(clade = %tree.describe(clade), "cutting clade");
            removed_leaves += tree.cut_clade(clade)?;
        }

        let extraction = Extraction {
            neighbors: tree.leaf_names(),
            total_leaves,
            removed_leaves,
        };
        info!(
            removed = extraction.removed_leaves,
            total = extraction.total_leaves,
            "neighbors extracted"
        );
        Ok(extraction)
    }

    /// Write neighbor names, one per line.
    #[instrument(level = "debug", skip(self, extraction))]
    pub fn write_neighbors(&self, path: &Path, extraction: &Extraction) -> ApplicationResult<()> {
        self.fs
            .write_atomic(path, &extraction.neighbors.join("\n"))
            .with_output_path(path)
    }

    /// Write the (pruned) tree as Newick.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn write_tree(&self, path: &Path, tree: &TreeArena) -> ApplicationResult<()> {
        let mut newick = tree.to_newick();
        newick.push('\n');
        self.fs
            .write_atomic(path, &newick)
            .with_output_path(path)
    }
}
