//! Property tests for normalization and comparison

use proptest::prelude::*;
use verifier_config::TextBlock;
use verifier_core::validate::{compare_any_order, compare_exact, split_lines};
use verifier_core::{normalize, validate, ComparisonMode};

fn line() -> impl Strategy<Value = String> {
    "[ a-c]{0,4}"
}

proptest! {
    #[test]
    fn single_string_and_one_element_sequence_normalize_alike(s in "[ \\ta-z\\n]{0,20}") {
        let single = TextBlock::Single(s.clone());
        let sequence = TextBlock::Lines(vec![s]);
        prop_assert_eq!(normalize(&single), normalize(&sequence));
    }

    #[test]
    fn normalized_text_has_no_blank_elements(lines in prop::collection::vec(line(), 0..8)) {
        let normalized = normalize(&TextBlock::Lines(lines.clone()));
        let expected = lines.iter().filter(|l| !l.trim().is_empty()).count();
        prop_assert_eq!(normalized.matches('\n').count(), expected);
        prop_assert!(!normalized.contains("\n\n"));
    }

    #[test]
    fn any_order_accepts_every_permutation(
        lines in prop::collection::vec("[a-c]{1,3}", 0..8),
        seed in any::<u64>(),
    ) {
        let mut shuffled = lines.clone();
        // Deterministic rotation plus reversal stands in for a shuffle
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
        }
        let actual: Vec<&str> = shuffled.iter().map(String::as_str).collect();
        let expected: Vec<&str> = lines.iter().map(String::as_str).collect();
        prop_assert!(compare_any_order(&actual, &expected).is_ok());
    }

    #[test]
    fn exact_order_accepts_own_output(lines in prop::collection::vec("[a-c]{1,3}", 0..8)) {
        let stdout = normalize(&TextBlock::Lines(lines.clone()));
        let outcome = validate(&stdout, &TextBlock::Lines(lines), ComparisonMode::ExactOrder);
        prop_assert!(outcome.is_pass());
    }

    #[test]
    fn exact_order_pass_implies_any_order_pass(
        actual in prop::collection::vec("[ab]", 0..5),
        expected in prop::collection::vec("[ab]", 0..5),
    ) {
        let actual: Vec<&str> = actual.iter().map(String::as_str).collect();
        let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
        if compare_exact(&actual, &expected).is_ok() {
            prop_assert!(compare_any_order(&actual, &expected).is_ok());
        }
    }

    #[test]
    fn split_lines_ignores_surrounding_whitespace(
        body in "[a-c]{1,3}(\\n[a-c]{1,3}){0,3}",
        pad in "[ \\n\\t]{0,4}",
    ) {
        let padded = format!("{pad}{body}{pad}");
        prop_assert_eq!(split_lines(&padded), split_lines(&body));
    }
}
