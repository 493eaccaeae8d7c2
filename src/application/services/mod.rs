//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod export;
mod import;
mod readme;

pub use export::{ConflictPolicy, DocumentService};
pub use import::ImportService;
pub use readme::ReadmeService;
