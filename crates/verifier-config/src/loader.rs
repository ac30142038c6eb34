//! Test Definition Loader
//!
//! Reads a JSON test definition from disk and validates it before any test runs.

use crate::definition::TestDefinition;
use crate::{ConfigError, ConfigResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

impl TestDefinition {
    /// Load and validate a test definition file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse and validate a test definition from JSON text
    ///
    /// `file` is only used to label parse errors.
    pub fn parse(content: &str, file: impl Into<PathBuf>) -> ConfigResult<Self> {
        let definition: Self =
            serde_json::from_str(content).map_err(|error| ConfigError::InvalidJson {
                file: file.into(),
                error,
            })?;

        definition.validate()?;
        Ok(definition)
    }

    /// Validate the test definition
    ///
    /// Empty names are rejected. Duplicate names are allowed but make the
    /// report ambiguous, so they are logged.
    pub fn validate(&self) -> ConfigResult<()> {
        for (index, test) in self.tests.iter().enumerate() {
            if test.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("tests[{}].name", index),
                    reason: "name cannot be empty".to_string(),
                });
            }
        }

        for name in self.duplicate_names() {
            tracing::warn!(test = name, "duplicate test name; report entries will be ambiguous");
        }

        Ok(())
    }

    /// Names declared more than once, each listed once in first-seen order
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for test in &self.tests {
            let name = test.name.as_str();
            if !seen.insert(name) && reported.insert(name) {
                duplicates.push(name);
            }
        }

        duplicates
    }
}
