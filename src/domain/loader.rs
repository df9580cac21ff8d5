//! Catalog loader: turns tokenized rows into courses and fills the index.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::domain::entities::Course;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::index::CourseIndex;
use crate::domain::row::Row;

/// First-field values that mark a header row.
pub const DEFAULT_HEADER_SENTINELS: [&str; 2] = ["courseId", "courseNum"];

/// Loader behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Exact, case-sensitive first-field values whose row is skipped
    pub header_sentinels: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            header_sentinels: DEFAULT_HEADER_SENTINELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Outcome of one `load` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Courses inserted into the index
    pub inserted: usize,
    /// Rows skipped for an empty first field or a header sentinel
    pub skipped_headers: usize,
    /// Rows skipped because their number was already indexed
    pub skipped_duplicates: usize,
    /// Prerequisite tokens with no matching row in the batch
    pub dropped_prerequisites: usize,
    /// Recoverable per-row errors, in row order
    pub errors: Vec<DomainError>,
}

impl LoadReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Builds validated course records from a batch of rows.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    options: LoaderOptions,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load `rows` into `index`.
    ///
    /// Malformed rows are collected in the report and loading continues.
    /// The first course loaded for a number wins; later rows with that number
    /// are skipped. Prerequisite tokens resolve against the first field of any
    /// other row in `rows`, including rows that end up skipped as duplicates.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn load(&self, rows: &[Row], index: &mut CourseIndex) -> DomainResult<LoadReport> {
        let batch_keys = Self::batch_keys(rows);
        let mut report = LoadReport::default();

        for row in rows {
            let number = match row.first() {
                Some(first) if !first.is_empty() && !self.is_header(first) => first,
                _ => {
                    report.skipped_headers += 1;
                    continue;
                }
            };

            if row.len() < 2 {
                let err = DomainError::MalformedRow {
                    line: row.line(),
                    fields: row.len(),
                };
                warn!("{}", err);
                report.errors.push(err);
                continue;
            }
            let title = row.field(1)?;

            if index.contains(number) {
                debug!("load: duplicate {} skipped", number);
                report.skipped_duplicates += 1;
                continue;
            }

            let mut prerequisites = Vec::new();
            for raw in row.fields().skip(2) {
                let token = raw.trim();
                if token.is_empty() {
                    continue;
                }
                // a row may not satisfy its own prerequisite
                let own = usize::from(token == number);
                if batch_keys.get(token).copied().unwrap_or(0) > own {
                    prerequisites.push(token.to_string());
                } else {
                    debug!("load: {} drops unknown prerequisite {}", number, token);
                    report.dropped_prerequisites += 1;
                }
            }

            index.insert(Course::new(number, title, prerequisites));
            report.inserted += 1;
        }

        debug!(
            "load: inserted={} duplicates={} errors={}",
            report.inserted,
            report.skipped_duplicates,
            report.errors.len()
        );
        Ok(report)
    }

    /// Count of rows per first field across the whole batch.
    fn batch_keys(rows: &[Row]) -> HashMap<&str, usize> {
        let mut keys: HashMap<&str, usize> = HashMap::new();
        for first in rows.iter().filter_map(Row::first) {
            *keys.entry(first).or_default() += 1;
        }
        keys
    }

    fn is_header(&self, first: &str) -> bool {
        self.options.header_sentinels.iter().any(|s| s == first)
    }
}
