//! Reasoning block removal
//!
//! Reasoning models (DeepSeek R1 and friends) prefix their answer with a
//! `<think>...</think>` block. Callers only get the answer.

use once_cell::sync::Lazy;
use regex::Regex;

static THINK_BLOCK: Lazy<Regex> = Lazy::new(|| {
    // (?i) case-insensitive, (?s) `.` spans newlines, `.*?` stops at the first close tag
    Regex::new(r"(?is)<think>.*?</think>").expect("static regex is valid")
});

/// Remove every `<think>...</think>` segment and trim surrounding whitespace
pub fn strip_reasoning(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_block() {
        assert_eq!(strip_reasoning("<think>reasoning</think>Hello"), "Hello");
    }

    #[test]
    fn test_only_block_leaves_nothing() {
        assert_eq!(strip_reasoning("<think>x</think>"), "");
        assert_eq!(strip_reasoning("  <think>x</think>\n\n "), "");
    }

    #[test]
    fn test_multiline_and_case_insensitive() {
        let text = "<THINK>\nstep one\nstep two\n</Think>\n\nThe answer is 4.";
        assert_eq!(strip_reasoning(text), "The answer is 4.");
    }

    #[test]
    fn test_non_greedy_keeps_text_between_blocks() {
        let text = "<think>a</think>keep<think>b</think> this";
        assert_eq!(strip_reasoning(text), "keep this");
    }

    #[test]
    fn test_plain_text_is_trimmed_only() {
        assert_eq!(strip_reasoning("  Hello there \n"), "Hello there");
    }

    #[test]
    fn test_unclosed_block_is_kept() {
        assert_eq!(strip_reasoning("<think>dangling"), "<think>dangling");
    }
}
