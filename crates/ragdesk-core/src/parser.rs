//! Splits a raw answer into its reasoning trace and the user-visible text.
//!
//! Answers from the retrieval service may open with a `<think>...</think>`
//! block. Only the first block is lifted out; anything after it, including a
//! second block, stays in the display text.

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::content::{REASONING_CLOSE, REASONING_OPEN};

/// Result of splitting an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedContent {
    /// Trimmed text between the first pair of reasoning tags, empty if none.
    pub reasoning: String,
    pub display_content: String,
}

impl ParsedContent {
    pub fn has_reasoning(&self) -> bool {
        !self.reasoning.is_empty()
    }
}

fn reasoning_block() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    BLOCK.get_or_init(|| {
        let pattern = format!(
            "(?s){}(.*?){}",
            regex::escape(REASONING_OPEN),
            regex::escape(REASONING_CLOSE)
        );
        Regex::new(&pattern).expect("reasoning pattern is a valid regex")
    })
}

/// Parse a raw answer. Never fails; unbalanced tags simply do not match.
pub fn parse(raw: &str) -> ParsedContent {
    let Some(caps) = reasoning_block().captures(raw) else {
        return ParsedContent {
            reasoning: String::new(),
            display_content: raw.to_string(),
        };
    };

    let (Some(block), Some(inner)) = (caps.get(0), caps.get(1)) else {
        return ParsedContent {
            reasoning: String::new(),
            display_content: raw.to_string(),
        };
    };

    let mut display = String::with_capacity(raw.len() - block.len());
    display.push_str(&raw[..block.start()]);
    display.push_str(&raw[block.end()..]);

    ParsedContent {
        reasoning: inner.as_str().trim().to_string(),
        display_content: display.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let parsed = parse("plain text");
        assert_eq!(parsed.reasoning, "");
        assert_eq!(parsed.display_content, "plain text");
        assert!(!parsed.has_reasoning());
    }

    #[test]
    fn test_plain_text_keeps_surrounding_whitespace() {
        let parsed = parse("  spaced answer \n");
        assert_eq!(parsed.display_content, "  spaced answer \n");
    }

    #[test]
    fn test_reasoning_block_is_extracted() {
        let parsed = parse("<think>step one</think>Final answer");
        assert_eq!(parsed.reasoning, "step one");
        assert_eq!(parsed.display_content, "Final answer");
    }

    #[test]
    fn test_multiline_reasoning_is_trimmed() {
        let raw = "<think>\n  first\n  second\n</think>\n\n事假全年以十四日為限。";
        let parsed = parse(raw);
        assert_eq!(parsed.reasoning, "first\n  second");
        assert_eq!(parsed.display_content, "事假全年以十四日為限。");
    }

    #[test]
    fn test_block_in_middle_joins_remaining_text() {
        let parsed = parse("Intro <think>hidden</think> outro");
        assert_eq!(parsed.reasoning, "hidden");
        assert_eq!(parsed.display_content, "Intro  outro");
    }

    #[test]
    fn test_only_first_block_is_honored() {
        let parsed = parse("<think>a</think>Answer<think>b</think>");
        assert_eq!(parsed.reasoning, "a");
        assert_eq!(parsed.display_content, "Answer<think>b</think>");
    }

    #[test]
    fn test_unclosed_tag_yields_no_match() {
        let raw = "<think>never closed. Answer";
        let parsed = parse(raw);
        assert_eq!(parsed.reasoning, "");
        assert_eq!(parsed.display_content, raw);
    }

    #[test]
    fn test_close_before_open_yields_no_match() {
        let raw = "</think>oops<think>";
        let parsed = parse(raw);
        assert_eq!(parsed.reasoning, "");
        assert_eq!(parsed.display_content, raw);
    }

    #[test]
    fn test_empty_block_removes_tags() {
        let parsed = parse("<think></think>Answer");
        assert_eq!(parsed.reasoning, "");
        assert_eq!(parsed.display_content, "Answer");
    }
}
