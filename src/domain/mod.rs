//! Domain layer: the directory tree and its pure transformations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod record;
pub mod render;

pub use arena::{
    validate_name, Directory, DirectoryNode, DirectoryTree, NodeDefaults, NodeId, TreeIterator,
    DEFAULT_ICON,
};
pub use error::{DomainError, DomainResult};
pub use record::DirectoryRecord;
pub use render::TreeRender;
