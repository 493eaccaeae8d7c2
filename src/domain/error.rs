//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent violations of the tree invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid directory name: {0:?}")]
    InvalidName(String),

    #[error("directory {parent:?} already has a child named {name:?}")]
    DuplicateName { parent: String, name: String },

    #[error("directory {parent:?} has no child named {name:?}")]
    ChildNotFound { parent: String, name: String },

    #[error("node does not belong to this tree: {0:?}")]
    UnknownNode(Index),

    #[error("malformed directory record: {reason}")]
    MalformedRecord { reason: String },
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
