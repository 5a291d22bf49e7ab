//! Job description keyword extraction and keyword relevance scoring

use crate::processing::text_processor::{lowercase_words, strip_punctuation};
use log::{debug, warn};
use std::collections::HashSet;

/// Minimum stripped length (exclusive) for a token to count as a keyword
const MIN_KEYWORD_CHARS: usize = 2;

/// Extract keywords from a reference text.
///
/// Lowercases, splits on whitespace, strips surrounding punctuation and keeps
/// tokens longer than two characters. Order and duplicates are preserved.
pub fn extract(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let keywords: Vec<String> = lowercase_words(text)
        .iter()
        .map(|word| strip_punctuation(word))
        .filter(|word| word.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect();

    debug!("Extracted {} keywords: {:?}", keywords.len(), keywords);
    keywords
}

/// Percentage of keywords hit by candidate words.
///
/// Every candidate word occurrence that is a keyword counts, so the result is
/// not capped at 100.
pub fn score_keyword_relevance(candidate: &str, keywords: &[String]) -> f64 {
    let index: HashSet<&str> = keywords.iter().map(String::as_str).collect();
    score_with_membership(candidate, keywords.len(), |word| index.contains(word))
}

/// Relevance with a caller-provided keyword membership test
pub(crate) fn score_with_membership<F>(candidate: &str, keyword_count: usize, is_keyword: F) -> f64
where
    F: Fn(&str) -> bool,
{
    if keyword_count == 0 {
        warn!("No job description or keywords provided for comparison");
        return 0.0;
    }

    let match_count = lowercase_words(candidate)
        .iter()
        .filter(|word| is_keyword(word.as_str()))
        .count();

    let relevance = match_count as f64 / keyword_count as f64 * 100.0;
    debug!("Keyword relevance score: {:.2}% ({} matches)", relevance, match_count);
    relevance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t").is_empty());
    }

    #[test]
    fn test_extract_strips_and_filters() {
        let extracted = extract("We need Python, SQL and (Rust)! An AI team.");
        assert_eq!(
            extracted,
            keywords(&["need", "python", "sql", "and", "rust", "team"])
        );
    }

    #[test]
    fn test_extract_keeps_duplicates_and_order() {
        let extracted = extract("Rust rust RUST python");
        assert_eq!(extracted, keywords(&["rust", "rust", "rust", "python"]));
    }

    #[test]
    fn test_extract_uses_stripped_length() {
        // "go," has three chars before stripping but only two after
        assert!(extract("go, js. c++").is_empty());
    }

    #[test]
    fn test_relevance_empty_keywords_is_zero() {
        assert_eq!(score_keyword_relevance("python rust", &[]), 0.0);
    }

    #[test]
    fn test_relevance_basic_ratio() {
        let kws = keywords(&["python", "rust", "docker", "kubernetes"]);
        let score = score_keyword_relevance("Python developer who loves Rust", &kws);
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_relevance_candidate_punctuation_not_stripped() {
        let kws = keywords(&["python"]);
        assert_eq!(score_keyword_relevance("python,", &kws), 0.0);
        assert_eq!(score_keyword_relevance("python", &kws), 100.0);
    }

    #[test]
    fn test_relevance_can_exceed_hundred() {
        let kws = keywords(&["python", "rust"]);
        let score = score_keyword_relevance("python python python rust", &kws);
        assert!((score - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_relevance_duplicate_keywords_only_grow_denominator() {
        let kws = keywords(&["rust", "rust", "python", "python"]);
        let score = score_keyword_relevance("rust", &kws);
        assert!((score - 25.0).abs() < 1e-9);
    }
}
