//! Course catalog service
//!
//! Owns the course index for the lifetime of the process and exposes the
//! load, list and search use cases.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{tokenize, CatalogLoader, Course, CourseIndex, LoadReport};
use crate::infrastructure::traits::FileSystem;

/// Service for loading and querying a course catalog.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
    loader: CatalogLoader,
    delimiter: u8,
    index: CourseIndex,
}

impl CatalogService {
    /// Create a service with an empty index.
    pub fn new(fs: Arc<dyn FileSystem>, loader: CatalogLoader, delimiter: u8) -> Self {
        Self {
            fs,
            loader,
            delimiter,
            index: CourseIndex::new(),
        }
    }

    pub fn index(&self) -> &CourseIndex {
        &self.index
    }

    /// Load a catalog file into the index.
    ///
    /// An unreadable file aborts the load before the index is touched.
    #[instrument(level = "debug", skip(self))]
    pub fn load_path(&mut self, path: &Path) -> ApplicationResult<LoadReport> {
        let text = self.fs.read_to_string(path).or_unreadable(path)?;
        let report = self.load_text(&text)?;
        info!(
            "loaded {} courses from {}",
            report.inserted,
            path.display()
        );
        Ok(report)
    }

    /// Load catalog text into the index.
    #[instrument(level = "debug", skip_all)]
    pub fn load_text(&mut self, text: &str) -> ApplicationResult<LoadReport> {
        let rows = tokenize(text, self.delimiter)?;
        let report = self.loader.load(&rows, &mut self.index)?;
        debug!("load_text: index now holds {} courses", self.index.len());
        Ok(report)
    }

    /// Full listing in ascending course-number order.
    pub fn list(&self) -> Vec<String> {
        self.index
            .iter()
            .flat_map(|course| course.listing_lines())
            .collect()
    }

    /// Look up a course by exact number. A miss is `None`, not an error.
    pub fn search(&self, number: &str) -> Option<Course> {
        self.index.find(number).cloned()
    }

    /// Search result as display lines.
    pub fn search_lines(&self, number: &str) -> Vec<String> {
        match self.index.find(number) {
            Some(course) => vec![
                "Course found:".to_string(),
                format!("{}, {}", course.number(), course.title()),
                format!("Prerequisites: {}", course.prerequisites_joined()),
            ],
            None => vec!["Course not found.".to_string()],
        }
    }

    /// Shape of the underlying search tree down to `max_depth` levels, with its height.
    pub fn tree(&self, max_depth: usize) -> String {
        format!(
            "{}height: {}",
            self.index.to_tree_string_with_depth(max_depth),
            self.index.height()
        )
    }
}
