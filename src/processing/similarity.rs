//! TF-IDF cosine similarity between a resume and a job description
//!
//! The corpus is always exactly the two documents being compared, so the
//! inverse document frequency only distinguishes shared terms from terms
//! unique to one side. Scores computed against different job descriptions are
//! therefore not comparable with each other.

use crate::processing::text_processor::term_counts;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Score returned when there is no reference text to compare against
pub const NEUTRAL_CONTENT_SCORE: f64 = 50.0;

/// Sparse L2-normalised TF-IDF vector.
///
/// Ordered storage keeps floating point summation order, and therefore
/// scores, identical between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Dot product; equals cosine similarity because both sides are unit length
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .map(|(term, w)| w * large.weight(term))
            .sum()
    }
}

/// Smoothed inverse document frequency: ln((1 + n) / (1 + df)) + 1
pub fn smoothed_idf(doc_count: usize, doc_freq: usize) -> f64 {
    ((1.0 + doc_count as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
}

/// Vectorize each document over the corpus formed by the documents themselves
pub fn vectorize(documents: &[&str]) -> Vec<TermVector> {
    let counts: Vec<BTreeMap<String, usize>> = documents.iter().map(|doc| term_counts(doc)).collect();

    // Count maps have unique keys, so each document adds at most one per term
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for doc_counts in &counts {
        for term in doc_counts.keys() {
            *doc_freq.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    counts
        .iter()
        .map(|doc_counts| {
            let mut weights: BTreeMap<String, f64> = doc_counts
                .iter()
                .map(|(term, count)| {
                    let df = doc_freq.get(term.as_str()).copied().unwrap_or(0);
                    (term.clone(), *count as f64 * smoothed_idf(documents.len(), df))
                })
                .collect();

            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for w in weights.values_mut() {
                    *w /= norm;
                }
            }
            TermVector { weights }
        })
        .collect()
}

/// Cosine similarity of two texts in [0, 1]; 0 when either has no terms
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let vectors = vectorize(&[a, b]);
    let (va, vb) = (&vectors[0], &vectors[1]);

    if va.is_empty() || vb.is_empty() {
        debug!("Similarity undefined for a document without terms, using 0");
        return 0.0;
    }

    va.dot(vb).clamp(0.0, 1.0)
}

/// Content quality as TF-IDF similarity to the reference, scaled to 0-100
pub fn score_content_quality(candidate: &str, reference: Option<&str>) -> f64 {
    let Some(reference) = reference.filter(|r| !r.trim().is_empty()) else {
        warn!("No job description provided for content quality evaluation");
        return NEUTRAL_CONTENT_SCORE;
    };

    let score = cosine_similarity(candidate, reference) * 100.0;
    debug!("Content quality score (similarity): {:.2}%", score);
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reference_is_neutral() {
        assert_eq!(score_content_quality("anything at all", None), 50.0);
        assert_eq!(score_content_quality("", None), 50.0);
    }

    #[test]
    fn test_blank_reference_is_neutral() {
        assert_eq!(score_content_quality("python developer", Some("")), 50.0);
        assert_eq!(score_content_quality("python developer", Some(" \t\n")), 50.0);
    }

    #[test]
    fn test_self_similarity_is_hundred() {
        let text = "Senior Rust engineer with Kubernetes and Postgres experience";
        let score = score_content_quality(text, Some(text));
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_texts_are_zero() {
        let score = score_content_quality("alpha beta gamma", Some("delta epsilon zeta"));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_empty_side_is_zero() {
        assert_eq!(score_content_quality("", Some("rust engineer")), 0.0);
        assert_eq!(score_content_quality("rust engineer", Some("a b c")), 0.0);
    }

    #[test]
    fn test_idf_values() {
        assert!((smoothed_idf(2, 2) - 1.0).abs() < 1e-12);
        assert!((smoothed_idf(2, 1) - (1.5f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_known_similarity_value() {
        // Shared "rust" has idf 1, unique terms have idf 1 + ln 1.5.
        // a = [rust, python], b = [rust, go]: cos = 1 / (1 + u^2)
        let u = 1.5f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + u * u);
        let sim = cosine_similarity("rust python", "rust go");
        assert!((sim - expected).abs() < 1e-9);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let vectors = vectorize(&["rust rust python", "python go"]);
        for v in &vectors {
            assert!((v.dot(v) - 1.0).abs() < 1e-9);
        }
        assert_eq!(vectors[0].len(), 2);
    }

    #[test]
    fn test_symmetry() {
        let a = "Built data pipelines in Python and SQL";
        let b = "Looking for a Python engineer who knows SQL and Airflow";
        assert!((cosine_similarity(a, b) - cosine_similarity(b, a)).abs() < 1e-12);
    }
}
