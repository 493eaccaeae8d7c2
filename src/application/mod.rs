//! Application layer: importers, exporters and the formats they speak
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod document;
pub mod error;
pub mod error_ext;
pub mod frontmatter;
pub mod services;
pub mod template;

pub use document::DocumentFormat;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use frontmatter::FrontMatter;
pub use template::{Placeholders, Template};
