//! Multi-phrase presence matching built on Aho-Corasick

use crate::error::{Result, ResumeForgeError};
use aho_corasick::{AhoCorasick, MatchKind};

/// Exact, case-sensitive presence test for a fixed list of phrases.
///
/// Callers that want case-insensitive matching lowercase both the phrases
/// and the haystack.
pub struct PhraseMatcher {
    automaton: AhoCorasick,
    phrase_count: usize,
}

impl PhraseMatcher {
    pub fn try_new(phrases: &[&str]) -> Result<Self> {
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(phrases)
            .map_err(|e| ResumeForgeError::InvalidInput(format!("Failed to build phrase matcher: {}", e)))?;

        Ok(Self {
            automaton,
            phrase_count: phrases.len(),
        })
    }

    /// Build a matcher over phrases known at compile time
    pub fn new(phrases: &[&str]) -> Self {
        Self::try_new(phrases).expect("Invalid static phrase list")
    }

    /// One flag per phrase, in construction order
    pub fn present(&self, haystack: &str) -> Vec<bool> {
        let mut found = vec![false; self.phrase_count];
        for mat in self.automaton.find_overlapping_iter(haystack) {
            found[mat.pattern().as_usize()] = true;
        }
        found
    }

    pub fn count_present(&self, haystack: &str) -> usize {
        self.present(haystack).into_iter().filter(|p| *p).count()
    }
}
