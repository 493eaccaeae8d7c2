//! Import service
//!
//! Builds directory trees from JSON/YAML documents and from real directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::application::document::parse_top_level;
use crate::application::{ApplicationError, ApplicationResult, FrontMatter, IoResultExt};
use crate::domain::{Directory, DirectoryRecord, DirectoryTree, DomainError, NodeDefaults};
use crate::infrastructure::traits::FileSystem;

/// Service for building trees from external sources.
pub struct ImportService {
    fs: Arc<dyn FileSystem>,
    defaults: NodeDefaults,
}

impl ImportService {
    /// Create a new import service.
    pub fn new(fs: Arc<dyn FileSystem>, defaults: NodeDefaults) -> Self {
        Self { fs, defaults }
    }

    /// Builds the tree stored under the top-level key `root_name` of a document.
    #[instrument(level = "debug", skip(self))]
    pub fn from_document(&self, path: &Path, root_name: &str) -> ApplicationResult<DirectoryTree> {
        let mut document = self.load_document(path)?;
        let value = document
            .remove(root_name)
            .ok_or_else(|| ApplicationError::RootNotFound {
                path: path.to_path_buf(),
                root: root_name.to_string(),
            })?;

        let record = DirectoryRecord::from_value(value)?;
        let tree = DirectoryTree::from_record(&record, &self.defaults)?;
        debug!("from_document: {} nodes under {:?}", tree.node_count(), root_name);
        Ok(tree)
    }

    /// Top-level keys of a document, in document order.
    pub fn root_names(&self, path: &Path) -> ApplicationResult<Vec<String>> {
        Ok(self.load_document(path)?.keys().cloned().collect())
    }

    fn load_document(&self, path: &Path) -> ApplicationResult<Map<String, Value>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        parse_top_level(path, &content)
    }

    /// Mirrors a real directory: every subdirectory becomes a child node and
    /// README front matter supplies icon, description and tags.
    #[instrument(level = "debug", skip(self))]
    pub fn from_directory(&self, path: &Path) -> ApplicationResult<DirectoryTree> {
        if !self.fs.is_dir(path) {
            return Err(ApplicationError::NotADirectory(path.to_path_buf()));
        }
        let path = self
            .fs
            .canonicalize(path)
            .with_path_context("canonicalize", path)?;

        let tree = self.import_directory(&path)?;
        debug!("from_directory: {} nodes below {}", tree.node_count(), path.display());
        Ok(tree)
    }

    fn import_directory(&self, path: &Path) -> ApplicationResult<DirectoryTree> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::InvalidName(path.display().to_string()))?;

        let mut subdirectories = Vec::new();
        let mut readme: Option<PathBuf> = None;

        // sorted so the README choice does not depend on enumeration order
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ApplicationError::OperationFailed {
                context: format!("scan directory: {}", path.display()),
                source: Box::new(e),
            })?;

            if entry.file_type().is_dir() {
                subdirectories.push(entry.into_path());
            } else if entry.file_type().is_file() && readme.is_none() && is_readme(entry.path()) {
                readme = Some(entry.into_path());
            }
        }

        let children = subdirectories
            .iter()
            .map(|subdirectory| self.import_directory(subdirectory))
            .collect::<ApplicationResult<Vec<_>>>()?;

        let mut directory = Directory::with_defaults(name, &self.defaults)?;
        if let Some(readme) = readme {
            let content = self
                .fs
                .read_to_string(&readme)
                .with_path_context("read readme", &readme)?;
            if let Some(front_matter) = FrontMatter::parse(&content, &readme)? {
                front_matter.apply(&mut directory);
            }
        }

        let mut tree = DirectoryTree::new(directory);
        let root = tree.root();
        tree.add_children(root, children)?;
        Ok(tree)
    }
}

/// `README.<ext>` with any extension, case-insensitive.
fn is_readme(path: &Path) -> bool {
    path.extension().is_some()
        && path
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case("readme"))
}
