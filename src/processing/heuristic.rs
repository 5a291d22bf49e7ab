//! Context-free heuristic scoring of a rendered resume
//!
//! Works on exact-case substrings and needs no job description. It measures
//! something different from [`crate::processing::ranking`] and the two are
//! never combined.

use crate::processing::matching::PhraseMatcher;
use crate::processing::text_processor::word_count;
use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::OnceLock;

pub const SECTION_PHRASES: [&str; 3] = ["Work Experience", "Education", "Skills"];
pub const BONUS_KEYWORDS: [&str; 3] = ["Python", "Machine Learning", "Team Leadership"];
pub const CONTACT_PHRASES: [&str; 2] = ["Phone", "Email"];

pub const SECTION_POINTS: i32 = 20;
pub const LENGTH_BONUS: i32 = 20;
pub const LENGTH_PENALTY: i32 = -10;
pub const KEYWORD_POINTS: i32 = 5;
pub const CONTACT_PENALTY: i32 = -20;
pub const WORD_BAND: RangeInclusive<usize> = 400..=800;

/// Itemised heuristic score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicBreakdown {
    pub section_points: i32,
    pub length_points: i32,
    pub keyword_points: i32,
    pub contact_points: i32,
    pub word_count: usize,
    pub score: u8,
}

impl HeuristicBreakdown {
    pub fn raw_total(&self) -> i32 {
        self.section_points + self.length_points + self.keyword_points + self.contact_points
    }
}

struct HeuristicMatchers {
    sections: PhraseMatcher,
    keywords: PhraseMatcher,
    contact: PhraseMatcher,
}

fn matchers() -> &'static HeuristicMatchers {
    static MATCHERS: OnceLock<HeuristicMatchers> = OnceLock::new();
    MATCHERS.get_or_init(|| HeuristicMatchers {
        sections: PhraseMatcher::new(&SECTION_PHRASES),
        keywords: PhraseMatcher::new(&BONUS_KEYWORDS),
        contact: PhraseMatcher::new(&CONTACT_PHRASES),
    })
}

pub fn breakdown(document: &str) -> HeuristicBreakdown {
    let matchers = matchers();

    let section_points = matchers.sections.count_present(document) as i32 * SECTION_POINTS;

    let words = word_count(document);
    let length_points = if WORD_BAND.contains(&words) {
        LENGTH_BONUS
    } else {
        LENGTH_PENALTY
    };

    let keyword_points = matchers.keywords.count_present(document) as i32 * KEYWORD_POINTS;

    let contact_points = if matchers.contact.present(document).iter().all(|p| *p) {
        0
    } else {
        CONTACT_PENALTY
    };

    let mut result = HeuristicBreakdown {
        section_points,
        length_points,
        keyword_points,
        contact_points,
        word_count: words,
        score: 0,
    };
    result.score = result.raw_total().clamp(0, 100) as u8;

    debug!(
        "Heuristic score {} (sections {}, length {}, keywords {}, contact {}, {} words)",
        result.score, section_points, length_points, keyword_points, contact_points, words
    );
    result
}

/// Heuristic resume score in [0, 100]
pub fn score_heuristic(document: &str) -> u8 {
    breakdown(document).score
}
