//! Tokenization primitives shared by the scorers
//!
//! The scorers deliberately use different tokenizations: keywords are
//! punctuation-stripped, candidate words are not, and the similarity model
//! uses its own word-character term pattern.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Two or more word characters between word boundaries.
const TERM_PATTERN: &str = r"\b\w\w+\b";

fn term_regex() -> &'static Regex {
    static TERM_REGEX: OnceLock<Regex> = OnceLock::new();
    TERM_REGEX.get_or_init(|| Regex::new(TERM_PATTERN).expect("Invalid term regex"))
}

/// Lowercase and split on whitespace, keeping punctuation attached
pub fn lowercase_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Strip leading and trailing ASCII punctuation
pub fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_punctuation())
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased terms for the vector-space model
pub fn terms(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    term_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Raw term counts for a document, in term order
pub fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for term in terms(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Truncate text to a maximum number of characters with an ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
        _ => format!("{}...", truncated),
    }
}
