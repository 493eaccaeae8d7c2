//! README exporter
//!
//! Materializes a tree as real directories, one templated `README.md` each.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info, instrument};

use crate::application::template::{builtin_placeholders, README_FILE};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt, Placeholders, Template};
use crate::domain::{DirectoryTree, NodeId};
use crate::infrastructure::traits::FileSystem;

/// Service for writing trees to disk.
pub struct ReadmeService {
    fs: Arc<dyn FileSystem>,
}

impl ReadmeService {
    /// Create a new README service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Creates `output_root/<name>` for `id` and every descendant.
    ///
    /// Directories are created top-down, each README is written after the
    /// node's children are complete. `extra` overrides built-in placeholders.
    /// Nothing is rolled back on failure.
    ///
    /// Returns the directory created for `id`.
    #[instrument(level = "debug", skip(self, tree, template, extra))]
    pub fn materialize(
        &self,
        tree: &DirectoryTree,
        id: NodeId,
        output_root: &Path,
        template: &Template,
        extra: &Placeholders,
    ) -> ApplicationResult<PathBuf> {
        self.materialize_at(tree, id, output_root, template, extra, &Local::now())
    }

    /// Like [`materialize`](Self::materialize) with a fixed timestamp for the date placeholders.
    pub fn materialize_at(
        &self,
        tree: &DirectoryTree,
        id: NodeId,
        output_root: &Path,
        template: &Template,
        extra: &Placeholders,
        now: &DateTime<Local>,
    ) -> ApplicationResult<PathBuf> {
        let target = output_root.join(tree.name(id)?);
        if self.fs.exists(&target) {
            return Err(ApplicationError::PathConflict(target));
        }
        self.fs
            .create_dir(&target)
            .with_path_context("create directory", &target)?;
        debug!("materialize: created {}", target.display());

        for &child in tree.children(id)? {
            self.materialize_at(tree, child, &target, template, extra, now)?;
        }

        let mut values = builtin_placeholders(tree, id, now)?;
        values.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        let readme = target.join(README_FILE);
        self.fs
            .write(&readme, &template.render(&values))
            .with_path_context("write readme", &readme)?;
        if tree.is_root(id) {
            info!("Materialized {} directories below {}", tree.node_count(), output_root.display());
        }
        Ok(target)
    }
}
