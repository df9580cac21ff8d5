//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Mark an I/O failure on `path` as an unreadable catalog source.
    ///
    /// # Example
    /// ```ignore
    /// let text = fs.read_to_string(&path).or_unreadable(&path)?;
    /// ```
    fn or_unreadable(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn or_unreadable(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })
    }
}
