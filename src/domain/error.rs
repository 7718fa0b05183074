//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree and target contracts.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("target set is empty")]
    EmptyTargetSet,

    #[error("target not found among tree leaves: {0}")]
    NameNotFound(String),

    #[error("node is not binary: expected 2 children, found {children}")]
    NonBinaryNode { children: usize },

    #[error("majority descent reached a leaf without finding a pure branch")]
    DescentPastLeaf,

    #[error("majority descent stopped at the root: no ancestor left to return")]
    NoValidAncestor,

    #[error("tree has no root")]
    EmptyTree,

    #[error("cannot cut the root clade")]
    CannotCutRoot,

    #[error("node does not belong to this tree")]
    UnknownNode,

    #[error("invalid newick at position {position}: {reason}")]
    Newick { position: usize, reason: String },
}

impl DomainError {
    pub(crate) fn newick(position: usize, reason: impl Into<String>) -> Self {
        Self::Newick {
            position,
            reason: reason.into(),
        }
    }
}
