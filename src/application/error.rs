//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add document and filesystem context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot parse {path}: {message}")]
    DocumentParse { path: PathBuf, message: String },

    #[error("root {root:?} not found in {path}")]
    RootNotFound { path: PathBuf, root: String },

    #[error("unsupported document format (expected .json, .yaml or .yml): {0}")]
    UnsupportedFormat(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("output directory already exists: {0}")]
    PathConflict(PathBuf),

    #[error("file already exists: {0}")]
    FileConflict(PathBuf),

    #[error("root {root:?} already present in {path}")]
    DuplicateRootKey { path: PathBuf, root: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
