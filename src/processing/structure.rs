//! Structural completeness: which expected resume sections are present

use crate::processing::matching::PhraseMatcher;
use log::debug;
use std::sync::OnceLock;

/// Section names looked for in the lowercased candidate text
pub const EXPECTED_SECTIONS: [&str; 4] = ["experience", "education", "skills", "projects"];

fn section_matcher() -> &'static PhraseMatcher {
    static MATCHER: OnceLock<PhraseMatcher> = OnceLock::new();
    MATCHER.get_or_init(|| PhraseMatcher::new(&EXPECTED_SECTIONS))
}

/// Sections from [`EXPECTED_SECTIONS`] found in the text, case-insensitively
pub fn found_sections(candidate: &str) -> Vec<&'static str> {
    let found = section_matcher().present(&candidate.to_lowercase());
    EXPECTED_SECTIONS
        .iter()
        .zip(found)
        .filter_map(|(section, present)| present.then_some(*section))
        .collect()
}

/// Share of expected sections present, as 0, 25, 50, 75 or 100
pub fn score_formatting(candidate: &str) -> f64 {
    let found = found_sections(candidate).len();
    let score = found as f64 / EXPECTED_SECTIONS.len() as f64 * 100.0;
    debug!("Formatting score: {}% ({} of {} sections)", score, found, EXPECTED_SECTIONS.len());
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sections() {
        assert_eq!(score_formatting(""), 0.0);
        assert_eq!(score_formatting("John Doe, software engineer"), 0.0);
    }

    #[test]
    fn test_all_sections_case_insensitive() {
        let text = "EXPERIENCE\nEducation\nskills\nProjects";
        assert_eq!(score_formatting(text), 100.0);
    }

    #[test]
    fn test_substring_matching() {
        // "Work Experience:" and "skillset" both count
        assert_eq!(score_formatting("Work Experience: x. skillset"), 50.0);
    }

    #[test]
    fn test_repeats_count_once() {
        assert_eq!(score_formatting("skills skills skills"), 25.0);
    }

    #[test]
    fn test_score_is_quantised_and_monotonic() {
        let allowed = [0.0, 25.0, 50.0, 75.0, 100.0];
        let mut text = String::from("Jane Roe");
        let mut previous = score_formatting(&text);
        assert!(allowed.contains(&previous));

        for section in EXPECTED_SECTIONS {
            text.push(' ');
            text.push_str(section);
            let current = score_formatting(&text);
            assert!(allowed.contains(&current));
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn test_found_sections_order() {
        assert_eq!(found_sections("Projects and Skills"), vec!["skills", "projects"]);
    }
}
