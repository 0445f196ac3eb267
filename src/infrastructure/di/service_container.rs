//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CurriculumService, MarkdownRenderer};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O boundaries shared by all services.
///
/// Services are created on demand; each call returns a fresh instance.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// An empty curriculum loader using the load settings.
    pub fn curriculum_service(&self) -> CurriculumService {
        CurriculumService::new(Arc::clone(&self.fs), self.settings.load.clone())
    }

    /// A markdown renderer using the render settings.
    pub fn renderer(&self) -> ApplicationResult<MarkdownRenderer> {
        MarkdownRenderer::new(Arc::clone(&self.fs), self.settings.render.clone())
    }
}
