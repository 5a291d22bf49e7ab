//! Resume ranking against an optional job description
//!
//! A [`RankingService`] is built once per job description. It precomputes the
//! keyword set and afterwards only reads it, so one instance can rank any
//! number of resumes from any number of threads.

use crate::error::{Result, ResumeForgeError};
use crate::processing::keywords;
use crate::processing::similarity::score_content_quality;
use crate::processing::structure::score_formatting;
use crate::processing::text_processor::lowercase_words;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Fixed metric weights for the overall score
#[derive(Debug, Clone, Copy)]
pub struct RankingWeights {
    pub keyword_relevance: f64,
    pub formatting: f64,
    pub content_quality: f64,
}

impl RankingWeights {
    pub fn sum(&self) -> f64 {
        self.keyword_relevance + self.formatting + self.content_quality
    }
}

pub const RANKING_WEIGHTS: RankingWeights = RankingWeights {
    keyword_relevance: 0.4,
    formatting: 0.3,
    content_quality: 0.3,
};

/// The three comparative metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    KeywordRelevance,
    Formatting,
    ContentQuality,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::KeywordRelevance, Metric::Formatting, Metric::ContentQuality];

    /// Scores strictly below this produce feedback
    pub fn threshold(self) -> f64 {
        match self {
            Metric::KeywordRelevance => 70.0,
            Metric::Formatting => 80.0,
            Metric::ContentQuality => 75.0,
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Metric::KeywordRelevance => RANKING_WEIGHTS.keyword_relevance,
            Metric::Formatting => RANKING_WEIGHTS.formatting,
            Metric::ContentQuality => RANKING_WEIGHTS.content_quality,
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            Metric::KeywordRelevance => {
                "Consider including more keywords from the job description to improve relevance."
            }
            Metric::Formatting => {
                "Improve the resume formatting by ensuring clear sections like 'Experience' and 'Education'."
            }
            Metric::ContentQuality => {
                "Work on improving the overall clarity and relevance of your resume content."
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::KeywordRelevance => "Keyword Relevance",
            Metric::Formatting => "Formatting",
            Metric::ContentQuality => "Content Quality",
        }
    }

    fn feedback_key(self) -> FeedbackKey {
        match self {
            Metric::KeywordRelevance => FeedbackKey::KeywordRelevance,
            Metric::Formatting => FeedbackKey::Formatting,
            Metric::ContentQuality => FeedbackKey::ContentQuality,
        }
    }
}

/// Feedback entries, ordered the way they are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKey {
    KeywordRelevance,
    Formatting,
    ContentQuality,
    Overall,
}

pub const OVERALL_FEEDBACK: &str = "Your resume is well-structured and relevant to the job description.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    pub keyword_relevance: f64,
    pub formatting: f64,
    pub content_quality: f64,
}

impl MetricScores {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::KeywordRelevance => self.keyword_relevance,
            Metric::Formatting => self.formatting,
            Metric::ContentQuality => self.content_quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub overall_score: f64,
    pub scores: MetricScores,
    pub feedback: BTreeMap<FeedbackKey, String>,
}

impl RankingResult {
    pub fn has_feedback_for(&self, metric: Metric) -> bool {
        self.feedback.contains_key(&metric.feedback_key())
    }
}

/// A ranked candidate, as produced by [`RankingService::rank_many`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub label: String,
    pub result: RankingResult,
}

/// Weighted sum of the metrics plus threshold-driven feedback.
///
/// The overall score is not clamped, so a keyword relevance above 100 carries
/// through.
pub fn aggregate(scores: MetricScores) -> RankingResult {
    let overall_score = Metric::ALL
        .iter()
        .map(|metric| metric.weight() * scores.get(*metric))
        .sum();

    RankingResult {
        overall_score,
        scores,
        feedback: generate_feedback(&scores),
    }
}

pub fn generate_feedback(scores: &MetricScores) -> BTreeMap<FeedbackKey, String> {
    let mut feedback: BTreeMap<FeedbackKey, String> = Metric::ALL
        .iter()
        .filter(|metric| scores.get(**metric) < metric.threshold())
        .map(|metric| (metric.feedback_key(), metric.advisory().to_string()))
        .collect();

    if feedback.is_empty() {
        feedback.insert(FeedbackKey::Overall, OVERALL_FEEDBACK.to_string());
    }
    feedback
}

/// Ranking context for one job description (or none)
#[derive(Debug, Clone, Default)]
pub struct RankingService {
    job_description: Option<String>,
    keywords: Vec<String>,
    keyword_index: HashSet<String>,
}

impl RankingService {
    /// A blank job description counts as none
    pub fn new(job_description: Option<String>) -> Self {
        let job_description = job_description.filter(|jd| !jd.trim().is_empty());
        let keywords = job_description
            .as_deref()
            .map(keywords::extract)
            .unwrap_or_default();
        let keyword_index = keywords.iter().cloned().collect();

        info!(
            "Ranking service ready ({} job description keywords)",
            keywords.len()
        );

        Self {
            job_description,
            keywords,
            keyword_index,
        }
    }

    pub fn with_job_description(job_description: impl Into<String>) -> Self {
        Self::new(Some(job_description.into()))
    }

    pub fn without_reference() -> Self {
        Self::new(None)
    }

    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn score_keyword_relevance(&self, candidate: &str) -> f64 {
        keywords::score_with_membership(candidate, self.keywords.len(), |word| {
            self.keyword_index.contains(word)
        })
    }

    pub fn score_formatting(&self, candidate: &str) -> f64 {
        score_formatting(candidate)
    }

    pub fn score_content_quality(&self, candidate: &str) -> f64 {
        score_content_quality(candidate, self.job_description.as_deref())
    }

    /// Rank one resume text
    pub fn rank(&self, candidate: &str) -> RankingResult {
        let scores = MetricScores {
            keyword_relevance: self.score_keyword_relevance(candidate),
            formatting: self.score_formatting(candidate),
            content_quality: self.score_content_quality(candidate),
        };

        let result = aggregate(scores);
        info!("Overall resume score: {:.2}%", result.overall_score);
        result
    }

    /// Distinct job description keywords the candidate never uses, in first-seen order
    pub fn missing_keywords(&self, candidate: &str) -> Vec<String> {
        let used: HashSet<String> = lowercase_words(candidate).into_iter().collect();
        let mut seen = HashSet::new();

        self.keywords
            .iter()
            .filter(|keyword| !used.contains(keyword.as_str()))
            .filter(|keyword| seen.insert(keyword.as_str()))
            .cloned()
            .collect()
    }

    /// Rank several labelled resumes, best first
    pub fn rank_many<I, L, T>(&self, candidates: I) -> Vec<RankedCandidate>
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: AsRef<str>,
    {
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|(label, text)| RankedCandidate {
                label: label.into(),
                result: self.rank(text.as_ref()),
            })
            .collect();

        ranked.sort_by(|a, b| b.result.overall_score.total_cmp(&a.result.overall_score));
        ranked
    }
}

/// Validated contents of a JSON rank request
#[derive(Debug, Clone, PartialEq)]
pub struct RankRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
}

/// Validate a `{"resume_text": ..., "job_description": ...}` request body
pub fn parse_rank_request(raw: &serde_json::Value) -> Result<RankRequest> {
    let object = raw
        .as_object()
        .ok_or_else(|| ResumeForgeError::InvalidInput("Rank request must be a JSON object".to_string()))?;

    let resume_text = match object.get("resume_text") {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(serde_json::Value::Null) | None => {
            return Err(ResumeForgeError::InvalidInput(
                "resume_text is required and must not be null".to_string(),
            ))
        }
        Some(other) => {
            return Err(ResumeForgeError::InvalidInput(format!(
                "resume_text must be a string, got {}",
                json_type_name(other)
            )))
        }
    };

    let job_description = match object.get("job_description") {
        Some(serde_json::Value::String(text)) => Some(text.clone()),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => {
            return Err(ResumeForgeError::InvalidInput(format!(
                "job_description must be a string, got {}",
                json_type_name(other)
            )))
        }
    };

    Ok(RankRequest {
        resume_text,
        job_description,
    })
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JOB: &str = "We are looking for a Software Engineer with experience in Python, \
        Machine Learning, and leadership abilities. The ideal candidate should have a \
        background in API development and team management.";

    const RESUME: &str = "John Doe\nSoftware Engineer with 5 years of experience in Python, \
        Django, and Machine Learning.\nEducation: B.S. in Computer Science\nExperience: \
        Developed API solutions and managed a team of engineers.\nSkills: Python, Machine \
        Learning, API Development, Leadership";

    fn scores(kr: f64, fmt: f64, cq: f64) -> MetricScores {
        MetricScores {
            keyword_relevance: kr,
            formatting: fmt,
            content_quality: cq,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((RANKING_WEIGHTS.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overall_is_not_clamped() {
        let result = aggregate(scores(150.0, 100.0, 100.0));
        assert!((result.overall_score - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_weighted_sum() {
        let result = aggregate(scores(50.0, 25.0, 10.0));
        assert!((result.overall_score - (20.0 + 7.5 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_all_above_threshold_gives_overall_only() {
        let result = aggregate(scores(70.0, 80.0, 75.0));
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(
            result.feedback.get(&FeedbackKey::Overall).map(String::as_str),
            Some(OVERALL_FEEDBACK)
        );
    }

    #[test]
    fn test_feedback_iff_below_threshold() {
        let result = aggregate(scores(69.9, 80.0, 74.9));
        assert!(result.has_feedback_for(Metric::KeywordRelevance));
        assert!(!result.has_feedback_for(Metric::Formatting));
        assert!(result.has_feedback_for(Metric::ContentQuality));
        assert!(!result.feedback.contains_key(&FeedbackKey::Overall));

        let keys: Vec<FeedbackKey> = result.feedback.keys().copied().collect();
        assert_eq!(keys, vec![FeedbackKey::KeywordRelevance, FeedbackKey::ContentQuality]);
    }

    #[test]
    fn test_all_below_threshold_gives_three_entries() {
        let result = aggregate(scores(0.0, 0.0, 0.0));
        assert_eq!(result.feedback.len(), 3);
        assert_eq!(
            result.feedback[&FeedbackKey::Formatting],
            Metric::Formatting.advisory()
        );
    }

    #[test]
    fn test_no_reference_defaults() {
        let service = RankingService::without_reference();
        assert!(service.keywords().is_empty());

        let result = service.rank(RESUME);
        assert_eq!(result.scores.keyword_relevance, 0.0);
        assert_eq!(result.scores.content_quality, 50.0);
        assert_eq!(result.scores.formatting, 75.0);
        assert!((result.overall_score - (0.0 + 22.5 + 15.0)).abs() < 1e-9);
    }

    #[test]
    fn test_blank_job_description_is_no_reference() {
        for blank in ["", "  \n"] {
            let service = RankingService::new(Some(blank.to_string()));
            assert!(service.job_description().is_none());
            assert!(service.keywords().is_empty());

            let result = service.rank("Experience Education Skills Projects python");
            assert_eq!(result.scores.content_quality, 50.0);
            assert_eq!(result.scores.formatting, 100.0);
            assert!((result.overall_score - 45.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rank_with_job_description() {
        let service = RankingService::with_job_description(JOB);
        let result = service.rank(RESUME);

        assert!(result.scores.keyword_relevance > 0.0);
        assert!(result.scores.content_quality > 0.0 && result.scores.content_quality < 100.0);
        assert_eq!(result.scores.formatting, 75.0);

        let expected = 0.4 * result.scores.keyword_relevance
            + 0.3 * result.scores.formatting
            + 0.3 * result.scores.content_quality;
        assert!((result.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_service_matches_free_function() {
        let service = RankingService::with_job_description(JOB);
        let keywords = keywords::extract(JOB);
        assert_eq!(
            service.score_keyword_relevance(RESUME),
            keywords::score_keyword_relevance(RESUME, &keywords)
        );
    }

    #[test]
    fn test_rank_is_repeatable_and_thread_safe() {
        let service = RankingService::with_job_description(JOB);
        let baseline = service.rank(RESUME);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| service.rank(RESUME))).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), baseline);
            }
        });
    }

    #[test]
    fn test_rank_many_sorted_descending() {
        let service = RankingService::with_job_description(JOB);
        let ranked = service.rank_many(vec![("empty", ""), ("good", RESUME)]);
        assert_eq!(ranked[0].label, "good");
        assert!(ranked[0].result.overall_score >= ranked[1].result.overall_score);
    }

    #[test]
    fn test_result_json_shape() {
        let value = serde_json::to_value(aggregate(scores(80.0, 50.0, 90.0))).unwrap();
        assert_eq!(value["overall_score"], json!(0.4 * 80.0 + 0.3 * 50.0 + 0.3 * 90.0));
        assert_eq!(value["scores"]["formatting"], json!(50.0));
        assert!(value["feedback"]["formatting"].is_string());
        assert!(value["feedback"].get("keyword_relevance").is_none());
    }

    #[test]
    fn test_parse_rank_request() {
        let request = parse_rank_request(&json!({"resume_text": "cv", "job_description": null})).unwrap();
        assert_eq!(request.resume_text, "cv");
        assert_eq!(request.job_description, None);

        let request = parse_rank_request(&json!({"resume_text": "cv", "job_description": "jd"})).unwrap();
        assert_eq!(request.job_description.as_deref(), Some("jd"));
    }

    #[test]
    fn test_parse_rank_request_rejects_invalid_text() {
        for body in [
            json!({"resume_text": null}),
            json!({}),
            json!({"resume_text": 42}),
            json!({"resume_text": "cv", "job_description": ["a"]}),
            json!("just a string"),
        ] {
            assert!(matches!(
                parse_rank_request(&body),
                Err(ResumeForgeError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_missing_keywords() {
        let service = RankingService::with_job_description("Python developer, Python and SQL experience");
        let missing = service.missing_keywords("Senior python developer");
        assert_eq!(missing, vec!["and", "sql", "experience"]);

        assert!(RankingService::without_reference().missing_keywords("anything").is_empty());
    }
}
