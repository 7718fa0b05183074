//! exnn: extract neighbor names from a phylogenetic tree.
//!
//! Given a rooted binary tree and a set of target leaves, the crate finds two
//! pivots: the MRCA of all targets ([`domain::find_mrca`]) and the MRCA of the
//! majority of targets ([`domain::find_majority_mrca`]), found by a
//! bipartition vote that tolerates outlier targets. Clades can then be cut and
//! the remaining leaf names exported.
//!
//! ```
//! use exnn::domain::{find_majority_mrca, find_mrca, TargetSet, TieBreak, TreeArena};
//!
//! let tree: TreeArena = "((A,B),(C,D));".parse().unwrap();
//! let targets: TargetSet = ["A", "B", "C"].into_iter().collect();
//!
//! let all = find_mrca(&tree, &targets).unwrap();
//! let majority = find_majority_mrca(&tree, &targets, TieBreak::Second).unwrap();
//! assert_eq!(Some(all), tree.root());
//! assert_eq!(Some(majority), tree.root());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
