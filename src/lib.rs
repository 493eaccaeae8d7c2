//! dirtree: declarative directory trees
//!
//! Trees are read from JSON/YAML documents or real directories, printed,
//! materialized as directories with templated READMEs, and written back as
//! documents.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
