//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DocumentService, ImportService, ReadmeService};
use crate::application::{ApplicationResult, Template};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub import: ImportService,
    pub readme: ReadmeService,
    pub documents: DocumentService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let import = ImportService::new(Arc::clone(&fs), settings.node_defaults());
        let readme = ReadmeService::new(Arc::clone(&fs));
        let documents = DocumentService::new(Arc::clone(&fs));

        Self {
            settings: Arc::new(settings),
            fs,
            import,
            readme,
            documents,
        }
    }

    /// Template from the configured file, or the built-in one.
    pub fn template(&self) -> ApplicationResult<Template> {
        match &self.settings.template {
            Some(path) => Template::load(self.fs.as_ref(), path),
            None => Ok(Template::builtin()),
        }
    }
}
