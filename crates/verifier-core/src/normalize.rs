//! Text block normalization

use verifier_config::TextBlock;

/// Normalize a text block into newline-terminated lines.
///
/// Each element is trimmed and followed by `\n`; elements that are empty
/// after trimming are dropped. A single string behaves exactly like a
/// one-element sequence.
pub fn normalize(block: &TextBlock) -> String {
    block
        .elements()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .fold(String::new(), |mut acc, s| {
            acc.push_str(s);
            acc.push('\n');
            acc
        })
}
