//! Test Definition Model
//!
//! Serde types mirroring the JSON test definition format.

use serde::{Deserialize, Deserializer, Serialize};

/// A complete test definition file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Settings shared by every test case
    #[serde(default)]
    pub config: SuiteSettings,

    /// Test cases in declaration order
    pub tests: Vec<TestCase>,
}

/// Suite-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSettings {
    /// Compare output lines as a multiset instead of positionally.
    ///
    /// Enabled by the string `"true"` (or a JSON `true`); any other value,
    /// or omitting the key, selects exact-order comparison.
    #[serde(default, deserialize_with = "deserialize_any_order")]
    pub any_order: bool,
}

/// A single named test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Report label for this case
    pub name: String,
    /// Text fed to the program's standard input
    pub input: TextBlock,
    /// Text the program is expected to write to standard output
    pub output: TextBlock,
}

impl TestCase {
    /// Create a new test case
    pub fn new(
        name: impl Into<String>,
        input: impl Into<TextBlock>,
        output: impl Into<TextBlock>,
    ) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Text declared either as one string or as a sequence of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextBlock {
    /// A single string, possibly containing embedded newlines
    Single(String),
    /// An ordered list of strings
    Lines(Vec<String>),
}

impl TextBlock {
    /// Iterate over the declared elements in order
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            TextBlock::Single(s) => std::slice::from_ref(s),
            TextBlock::Lines(lines) => lines,
        };
        slice.iter().map(String::as_str)
    }
}

impl Default for TextBlock {
    fn default() -> Self {
        TextBlock::Lines(Vec::new())
    }
}

impl From<&str> for TextBlock {
    fn from(value: &str) -> Self {
        TextBlock::Single(value.to_string())
    }
}

impl From<String> for TextBlock {
    fn from(value: String) -> Self {
        TextBlock::Single(value)
    }
}

impl From<Vec<&str>> for TextBlock {
    fn from(value: Vec<&str>) -> Self {
        TextBlock::Lines(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for TextBlock {
    fn from(value: Vec<String>) -> Self {
        TextBlock::Lines(value)
    }
}

fn deserialize_any_order<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::String(s) => s == "true",
        _ => false,
    })
}
