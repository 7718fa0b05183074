//! Domain layer: the tree model and the pivot algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod majority;
pub mod mrca;
pub mod newick;
pub mod tally;
pub mod targets;

pub use arena::{NodeData, NodeId, TreeArena, TreeNode};
pub use error::DomainError;
pub use majority::{find_majority_mrca, TieBreak};
pub use mrca::find_mrca;
pub use tally::{SubtreeTally, Tally};
pub use targets::TargetSet;
