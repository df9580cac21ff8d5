//! Course catalog planner.
//!
//! Loads a delimited course list into an ordered index keyed by course
//! number and answers listing and lookup queries against it.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::CatalogService;
pub use domain::{CatalogLoader, Course, CourseIndex, LoadReport};
