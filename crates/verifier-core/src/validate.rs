//! Output validation
//!
//! Compares what the program wrote to stdout against the expected text block.
//! Both sides are trimmed as a whole and split into lines, then compared
//! either positionally ([`ComparisonMode::ExactOrder`]) or as multisets
//! ([`ComparisonMode::AnyOrder`]). Only the first discrepancy is reported.

use crate::normalize::normalize;
use std::fmt;
use verifier_config::{SuiteSettings, TextBlock};

/// How captured output lines are matched against expected lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonMode {
    /// Line `i` of the output must equal line `i` of the expectation
    #[default]
    ExactOrder,
    /// Output and expectation must be equal as multisets of lines
    AnyOrder,
}

impl ComparisonMode {
    /// Select the mode configured for a suite
    pub fn from_settings(settings: &SuiteSettings) -> Self {
        if settings.any_order {
            ComparisonMode::AnyOrder
        } else {
            ComparisonMode::ExactOrder
        }
    }

    /// Get the mode name
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonMode::ExactOrder => "exact-order",
            ComparisonMode::AnyOrder => "any-order",
        }
    }
}

/// First discrepancy found between actual and expected output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The program produced fewer lines than expected
    NotEnoughLines { expected: usize, actual: usize },
    /// The program produced more lines than expected
    TooManyLines { expected: usize, actual: usize },
    /// A line differs at a zero-based position
    IncorrectLine {
        position: usize,
        expected: String,
        actual: String,
    },
    /// An expected line was not found among the remaining output lines
    Missing { line: String },
    /// Output lines left over after every expected line was matched
    Extra { lines: Vec<String> },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::NotEnoughLines { expected, actual } => write!(
                f,
                "not enough output lines provided (expected {}, got {})",
                expected, actual
            ),
            Mismatch::TooManyLines { expected, actual } => write!(
                f,
                "too many output lines provided (expected {}, got {})",
                expected, actual
            ),
            Mismatch::IncorrectLine {
                position,
                expected,
                actual,
            } => write!(
                f,
                "incorrect output line at position {}: expected '{}' got '{}'",
                position, expected, actual
            ),
            Mismatch::Missing { line } => write!(f, "'{}' expected but not produced", line),
            Mismatch::Extra { lines } => {
                let quoted: Vec<String> = lines.iter().map(|l| format!("'{}'", l)).collect();
                write!(f, "extra values produced: [{}]", quoted.join(", "))
            }
        }
    }
}

/// Result of validating one run's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    Fail(Mismatch),
}

impl ValidationOutcome {
    /// Check if the output matched
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationOutcome::Pass)
    }

    /// The mismatch, if validation failed
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            ValidationOutcome::Pass => None,
            ValidationOutcome::Fail(mismatch) => Some(mismatch),
        }
    }
}

impl From<Result<(), Mismatch>> for ValidationOutcome {
    fn from(result: Result<(), Mismatch>) -> Self {
        match result {
            Ok(()) => ValidationOutcome::Pass,
            Err(mismatch) => ValidationOutcome::Fail(mismatch),
        }
    }
}

/// Validate captured stdout against an expected text block
pub fn validate(
    actual_stdout: &str,
    expected: &TextBlock,
    mode: ComparisonMode,
) -> ValidationOutcome {
    let expected = normalize(expected);
    let actual_lines = split_lines(actual_stdout);
    let expected_lines = split_lines(&expected);

    match mode {
        ComparisonMode::ExactOrder => compare_exact(&actual_lines, &expected_lines),
        ComparisonMode::AnyOrder => compare_any_order(&actual_lines, &expected_lines),
    }
    .into()
}

/// Trim the text as a whole and split it into lines.
///
/// Whitespace-only text has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.trim().lines().collect()
}

/// Positional comparison; the lowest failing index wins
pub fn compare_exact(actual: &[&str], expected: &[&str]) -> Result<(), Mismatch> {
    for i in 0..actual.len().max(expected.len()) {
        if i >= actual.len() {
            return Err(Mismatch::NotEnoughLines {
                expected: expected.len(),
                actual: actual.len(),
            });
        }
        if i >= expected.len() {
            return Err(Mismatch::TooManyLines {
                expected: expected.len(),
                actual: actual.len(),
            });
        }
        if actual[i] != expected[i] {
            return Err(Mismatch::IncorrectLine {
                position: i,
                expected: expected[i].to_string(),
                actual: actual[i].to_string(),
            });
        }
    }
    Ok(())
}

/// Multiset comparison; expected lines are consumed in declared order
pub fn compare_any_order(actual: &[&str], expected: &[&str]) -> Result<(), Mismatch> {
    let mut remaining: Vec<&str> = actual.to_vec();

    for line in expected {
        match remaining.iter().position(|candidate| candidate == line) {
            Some(pos) => {
                remaining.remove(pos);
            }
            None => {
                return Err(Mismatch::Missing {
                    line: line.to_string(),
                })
            }
        }
    }

    if !remaining.is_empty() {
        return Err(Mismatch::Extra {
            lines: remaining.into_iter().map(String::from).collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn exact(actual: &str, expected: Vec<&str>) -> ValidationOutcome {
        validate(actual, &TextBlock::from(expected), ComparisonMode::ExactOrder)
    }

    fn any(actual: &str, expected: Vec<&str>) -> ValidationOutcome {
        validate(actual, &TextBlock::from(expected), ComparisonMode::AnyOrder)
    }

    // ------------------------------------------------------------------
    // Exact order
    // ------------------------------------------------------------------

    #[test]
    fn test_exact_pass() {
        assert!(exact("a\nb\n", vec!["a", "b"]).is_pass());
    }

    #[test]
    fn test_exact_is_not_commutative() {
        assert_eq!(
            exact("a\nb", vec!["b", "a"]),
            ValidationOutcome::Fail(Mismatch::IncorrectLine {
                position: 0,
                expected: "b".to_string(),
                actual: "a".to_string(),
            })
        );
    }

    #[test]
    fn test_exact_output_shorter_than_expected() {
        assert_eq!(
            exact("a", vec!["a", "b"]),
            ValidationOutcome::Fail(Mismatch::NotEnoughLines {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_exact_output_longer_than_expected() {
        assert_eq!(
            exact("a\nb\nc", vec!["a", "b"]),
            ValidationOutcome::Fail(Mismatch::TooManyLines {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_exact_reports_lowest_index_first() {
        // Position 1 differs before the length difference at position 2
        let outcome = exact("a\nx", vec!["a", "b", "c"]);
        assert_eq!(
            outcome.mismatch(),
            Some(&Mismatch::IncorrectLine {
                position: 1,
                expected: "b".to_string(),
                actual: "x".to_string(),
            })
        );
    }

    #[test]
    fn test_exact_empty_output_against_expected_line() {
        assert_eq!(
            exact("", vec!["x"]),
            ValidationOutcome::Fail(Mismatch::NotEnoughLines {
                expected: 1,
                actual: 0
            })
        );
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t\n")]
    #[case("\n")]
    fn test_whitespace_only_output_matches_empty_expectation(#[case] actual: &str) {
        assert!(exact(actual, vec![]).is_pass());
        assert!(any(actual, vec!["", "  "]).is_pass());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(exact("\n\n  a\nb  \n\n", vec!["a", "b"]).is_pass());
    }

    #[test]
    fn test_inner_line_whitespace_is_significant() {
        assert!(!exact("a\n b\nc", vec!["a", "b", "c"]).is_pass());
    }

    #[test]
    fn test_crlf_output_is_accepted() {
        assert!(exact("a\r\nb\r\n", vec!["a", "b"]).is_pass());
    }

    #[test]
    fn test_expected_single_string_with_newlines() {
        let expected = TextBlock::from("1\n2\n3");
        assert!(validate("1\n2\n3\n", &expected, ComparisonMode::ExactOrder).is_pass());
    }

    // ------------------------------------------------------------------
    // Any order
    // ------------------------------------------------------------------

    #[test]
    fn test_any_order_is_commutative() {
        assert!(any("a\nb", vec!["b", "a"]).is_pass());
    }

    #[test]
    fn test_any_order_extra_duplicate() {
        assert_eq!(
            any("a\na\nb", vec!["a", "b"]),
            ValidationOutcome::Fail(Mismatch::Extra {
                lines: vec!["a".to_string()]
            })
        );
    }

    #[test]
    fn test_any_order_missing_line() {
        assert_eq!(
            any("a\nc", vec!["a", "b", "c"]),
            ValidationOutcome::Fail(Mismatch::Missing {
                line: "b".to_string()
            })
        );
    }

    #[test]
    fn test_any_order_duplicates_must_match_counts() {
        assert_eq!(
            any("a\nb", vec!["a", "a", "b"]),
            ValidationOutcome::Fail(Mismatch::Missing {
                line: "a".to_string()
            })
        );
    }

    #[test]
    fn test_any_order_missing_reported_before_extra() {
        let outcome = any("x\ny", vec!["a"]);
        assert_eq!(
            outcome.mismatch(),
            Some(&Mismatch::Missing {
                line: "a".to_string()
            })
        );
    }

    #[test]
    fn test_any_order_extra_keeps_output_order() {
        assert_eq!(
            any("z\na\ny", vec!["a"]),
            ValidationOutcome::Fail(Mismatch::Extra {
                lines: vec!["z".to_string(), "y".to_string()]
            })
        );
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    #[rstest]
    #[case(
        Mismatch::NotEnoughLines { expected: 2, actual: 1 },
        "not enough output lines provided (expected 2, got 1)"
    )]
    #[case(
        Mismatch::TooManyLines { expected: 1, actual: 2 },
        "too many output lines provided (expected 1, got 2)"
    )]
    #[case(
        Mismatch::IncorrectLine { position: 3, expected: "b".into(), actual: "a".into() },
        "incorrect output line at position 3: expected 'b' got 'a'"
    )]
    #[case(
        Mismatch::Missing { line: "42".into() },
        "'42' expected but not produced"
    )]
    #[case(
        Mismatch::Extra { lines: vec!["a".into(), "b".into()] },
        "extra values produced: ['a', 'b']"
    )]
    fn test_mismatch_messages(#[case] mismatch: Mismatch, #[case] message: &str) {
        assert_eq!(mismatch.to_string(), message);
    }

    #[test]
    fn test_mode_from_settings() {
        let settings = SuiteSettings { any_order: true };
        assert_eq!(ComparisonMode::from_settings(&settings), ComparisonMode::AnyOrder);
        assert_eq!(
            ComparisonMode::from_settings(&SuiteSettings::default()),
            ComparisonMode::ExactOrder
        );
    }
}
