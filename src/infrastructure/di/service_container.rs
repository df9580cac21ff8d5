//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::CatalogService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{CatalogLoader, LoaderOptions};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies for service construction.
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

    /// Build a catalog service with an empty index.
    pub fn catalog_service(&self) -> ApplicationResult<CatalogService> {
        let delimiter = self.settings.delimiter_byte().ok_or_else(|| ApplicationError::Config {
            message: format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.settings.delimiter
            ),
        })?;
        let loader = CatalogLoader::with_options(LoaderOptions {
            header_sentinels: self.settings.header_sentinels.clone(),
        });
        Ok(CatalogService::new(Arc::clone(&self.fs), loader, delimiter))
    }
}
