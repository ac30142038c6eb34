//! Verifier Test Definitions
//!
//! Provides the data model and loading for verifier test definition files:
//! - Suite-wide settings (comparison mode)
//! - Named test cases with input and expected output text blocks
//! - JSON loading with up-front validation
//!
//! A definition file looks like:
//!
//! ```json
//! {
//!   "config": { "any_order": "true" },
//!   "tests": [
//!     { "name": "echo", "input": ["a", "b"], "output": "a\nb" }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use verifier_config::TestDefinition;
//! use std::path::Path;
//!
//! let definition = TestDefinition::load_from_file(Path::new("tests.json")).unwrap();
//! println!("{} tests", definition.tests.len());
//! ```

pub mod definition;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Test definition errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Test definition file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read test definition file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON in {file}: {error}")]
    InvalidJson {
        file: PathBuf,
        error: serde_json::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for test definition operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use definition::{SuiteSettings, TestCase, TestDefinition, TextBlock};
