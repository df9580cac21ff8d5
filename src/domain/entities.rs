//! Domain entities: core data structures

use std::fmt;

use itertools::Itertools;

/// Marker line rendered for a course without prerequisites.
pub const NO_PREREQUISITES: &str = "No Prerequisites.";

/// One catalog entry.
///
/// Immutable after construction: fields are only reachable through getters,
/// so an indexed course can be read but never changed in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Unique identifier and ordering key, e.g. "CSCI200"
    number: String,
    /// Display-only title
    title: String,
    /// Course numbers known to exist in the same load batch, in token order
    prerequisites: Vec<String>,
}

impl Course {
    pub fn new(
        number: impl Into<String>,
        title: impl Into<String>,
        prerequisites: Vec<String>,
    ) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            prerequisites,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub fn has_prerequisites(&self) -> bool {
        !self.prerequisites.is_empty()
    }

    /// Prerequisites joined as `"A, B, C"` (empty string when there are none).
    pub fn prerequisites_joined(&self) -> String {
        self.prerequisites.iter().join(", ")
    }

    /// Lines emitted for this course by a full listing:
    /// `"<number>: <title>"`, the prerequisite line, and a blank separator.
    pub fn listing_lines(&self) -> [String; 3] {
        let prereq_line = if self.has_prerequisites() {
            format!("Prerequisites: {}", self.prerequisites_joined())
        } else {
            NO_PREREQUISITES.to_string()
        };
        [self.to_string(), prereq_line, String::new()]
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.number, self.title)
    }
}
