//! Applies text expansion to the prose sections of a resume

use crate::input::parser::ResumeData;
use crate::llm::expander::TextExpander;
use crate::llm::prompts::{PromptTemplates, SummaryParams};
use chrono::{Datelike, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// What happened during an enhancement pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancementSummary {
    pub attempted: usize,
    pub expanded: usize,
    pub failed: usize,
}

impl EnhancementSummary {
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.expanded == 0
    }
}

pub struct ResumeEnhancer<E> {
    expander: E,
    prompts: PromptTemplates,
}

impl<E: TextExpander> ResumeEnhancer<E> {
    pub fn new(expander: E) -> Self {
        Self {
            expander,
            prompts: PromptTemplates::default(),
        }
    }

    async fn attempt(&self, label: &str, prompt: &str, summary: &mut EnhancementSummary) -> Option<String> {
        summary.attempted += 1;
        match self.expander.expand(prompt).await {
            Ok(expanded) => {
                summary.expanded += 1;
                Some(expanded)
            }
            Err(e) => {
                summary.failed += 1;
                warn!("Keeping original {} text, expansion failed: {}", label, e);
                None
            }
        }
    }

    /// Expand one section; on failure the original text is returned
    pub async fn expand_section(&self, section: &str, text: &str, summary: &mut EnhancementSummary) -> String {
        let prompt = self.prompts.render_section(section, text);
        self.attempt(section, &prompt, summary)
            .await
            .unwrap_or_else(|| text.to_string())
    }

    /// Expand the career summary and experience descriptions in place.
    ///
    /// A resume without a summary gets one drafted from its most recent role.
    pub async fn enhance(&self, data: &mut ResumeData) -> EnhancementSummary {
        let mut summary = EnhancementSummary::default();

        if data.has_summary() {
            let current = data.career_summary.clone();
            data.career_summary = self.expand_section("career summary", &current, &mut summary).await;
        } else if let Some(params) = summary_params(data, Utc::now().year()) {
            let prompt = self.prompts.render_summary(&params);
            if let Some(drafted) = self.attempt("professional summary", &prompt, &mut summary).await {
                data.career_summary = drafted;
            }
        }

        for experience in data.experience.iter_mut() {
            let Some(description) = experience.description.clone() else {
                continue;
            };
            let section = format!("work experience entry for {} at {}", experience.role, experience.company);
            experience.description = Some(self.expand_section(&section, &description, &mut summary).await);
        }

        info!(
            "Expansion finished: {} of {} sections expanded",
            summary.expanded, summary.attempted
        );
        summary
    }
}

/// Prompt parameters for drafting a summary; needs at least one experience entry
pub fn summary_params(data: &ResumeData, current_year: i32) -> Option<SummaryParams> {
    let latest = data.experience.first()?;
    let earliest_year = data
        .experience
        .iter()
        .filter_map(|exp| exp.start_date.get(..4)?.parse::<i32>().ok())
        .min()?;

    Some(SummaryParams {
        name: data.name.clone(),
        job_title: latest.role.clone(),
        years_of_experience: (current_year - earliest_year).max(0) as u32,
        skills: data.skills.clone(),
    })
}
