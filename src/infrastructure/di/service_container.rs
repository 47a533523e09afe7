//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::services::{SystemsService, ValidationService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and the I/O boundary shared by all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Directory relative paths are resolved against
    pub project_dir: PathBuf,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, project_dir: PathBuf) -> Self {
        Self::with_deps(settings, project_dir, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, project_dir: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            project_dir,
        }
    }

    pub fn systems_service(&self) -> SystemsService {
        SystemsService::new(Arc::clone(&self.fs))
    }

    pub fn validation_service(&self) -> ValidationService {
        ValidationService::new(Arc::clone(&self.fs))
    }

    /// Resolve a path from the command line or settings against the project dir.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        Settings::resolve(&self.project_dir, path)
    }
}
