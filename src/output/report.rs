//! Report structures produced by the generate, score and rank commands

use crate::llm::EnhancementSummary;
use crate::output::template::TemplateKind;
use crate::processing::heuristic::HeuristicBreakdown;
use crate::processing::ranking::{RankedCandidate, RankingResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything known about one generated or scored resume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeReport {
    /// Candidate name, or the input file name when scoring raw text
    pub candidate: String,

    /// Template used when the resume was generated here
    pub template: Option<TemplateKind>,

    pub heuristic: HeuristicBreakdown,

    /// Absent for heuristic-only scoring
    pub ranking: Option<RankingResult>,

    /// Distinct job description keywords absent from the resume
    pub missing_keywords: Vec<String>,

    pub enhancement: Option<EnhancementSummary>,

    /// Where the rendered resume was written
    pub output_path: Option<PathBuf>,

    pub metadata: ReportMetadata,
}

impl ResumeReport {
    pub fn overall_percentage(&self) -> Option<u8> {
        self.ranking.as_ref().map(|ranking| score_percentage(ranking.overall_score))
    }
}

/// Several resumes ranked against the same job description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub candidates: Vec<RankedCandidate>,
    pub metadata: ReportMetadata,
}

impl RankingReport {
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.candidates.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub job_description_provided: bool,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(processing_time_ms: u64, job_description_provided: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            processing_time_ms,
            job_description_provided,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Round a metric to a whole percentage for badges; keyword relevance can exceed 100
pub fn score_percentage(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_percentage() {
        assert_eq!(score_percentage(49.6), 50);
        assert_eq!(score_percentage(140.0), 100);
        assert_eq!(score_percentage(-3.0), 0);
        assert_eq!(score_percentage(f64::NAN), 0);
    }
}
