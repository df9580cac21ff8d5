//! Domain layer: entities and catalog logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod index;
pub mod loader;
pub mod row;

pub use entities::{Course, NO_PREREQUISITES};
pub use error::{DomainError, DomainResult};
pub use index::{CourseIndex, InOrderIterator, IndexNode, DEFAULT_RENDER_DEPTH, TRUNCATED_MARKER};
pub use loader::{CatalogLoader, LoadReport, LoaderOptions, DEFAULT_HEADER_SENTINELS};
pub use row::{tokenize, Row};

/// Expand environment variables and `~` in a path string.
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
