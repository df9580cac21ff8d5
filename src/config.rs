//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursecat/coursecat.toml`
//! 3. Local config: `<project_dir>/.coursecat.toml`
//! 4. Environment variables: `COURSECAT_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DEFAULT_HEADER_SENTINELS};

/// Unified configuration for coursecat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Field delimiter of catalog files (default: ',')
    pub delimiter: char,
    /// First-field values that mark a header row
    pub header_sentinels: Vec<String>,
    /// Catalog preloaded by the interactive menu
    pub catalog: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header_sentinels: DEFAULT_HEADER_SENTINELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            catalog: None,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub delimiter: Option<char>,
    pub header_sentinels: Option<Vec<String>>,
    pub catalog: Option<PathBuf>,
}

/// Get the XDG config directory for coursecat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursecat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursecat.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".coursecat.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Delimiter as a byte, `None` unless it is a single ASCII character.
    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter.is_ascii().then_some(self.delimiter as u8)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(catalog) = &self.catalog {
            let expanded = expand_env_vars(catalog.to_string_lossy().as_ref());
            self.catalog = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            delimiter: overlay.delimiter.unwrap_or(self.delimiter),
            header_sentinels: overlay
                .header_sentinels
                .as_ref()
                .map(|o| Self::merge_array(&self.header_sentinels, o))
                .unwrap_or_else(|| self.header_sentinels.clone()),
            catalog: overlay.catalog.clone().or_else(|| self.catalog.clone()),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            delimiter: global.delimiter.unwrap_or(self.delimiter),
            header_sentinels: global
                .header_sentinels
                .clone()
                .unwrap_or_else(|| self.header_sentinels.clone()),
            catalog: global.catalog.clone().or_else(|| self.catalog.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.coursecat.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply COURSECAT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("COURSECAT")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("header_sentinels"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("delimiter") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => settings.delimiter = c,
                _ => {
                    return Err(ApplicationError::Config {
                        message: format!("COURSECAT_DELIMITER must be one character, got {val:?}"),
                    })
                }
            }
        }
        if let Ok(val) = config.get::<Vec<String>>("header_sentinels") {
            settings.header_sentinels = val;
        }
        if let Ok(val) = config.get_string("catalog") {
            settings.catalog = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coursecat configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/coursecat/coursecat.toml
#   Local:  <project_dir>/.coursecat.toml
#   Env:    COURSECAT_* environment variables
#
# Local header_sentinels UNION with global; use "!value" to remove one:
#   header_sentinels = ["Course", "!courseNum"]

# Field delimiter of catalog files
# delimiter = ","

# First-field values that mark a header row (case-sensitive)
# header_sentinels = ["courseId", "courseNum"]

# Catalog preloaded by the interactive menu
# catalog = "~/courses/ABCU_Advising_Program_Input.csv"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
