//! Prompt templates for resume text expansion

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub section_refinement: String,
    pub professional_summary: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            section_refinement: SECTION_REFINEMENT_TEMPLATE.to_string(),
            professional_summary: PROFESSIONAL_SUMMARY_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for the professional summary prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryParams {
    pub name: String,
    pub job_title: String,
    pub years_of_experience: u32,
    pub skills: Vec<String>,
}

impl PromptTemplates {
    /// Prompt asking the model to write one resume section from raw notes
    pub fn render_section(&self, section: &str, input: &str) -> String {
        self.section_refinement
            .replace("{section}", section)
            .replace("{input}", input.trim())
    }

    pub fn render_summary(&self, params: &SummaryParams) -> String {
        let skills = if params.skills.is_empty() {
            "their field".to_string()
        } else {
            params.skills.join(", ")
        };

        self.professional_summary
            .replace("{name}", &params.name)
            .replace("{job_title}", &params.job_title)
            .replace("{years}", &params.years_of_experience.to_string())
            .replace("{skills}", &skills)
    }
}

const SECTION_REFINEMENT_TEMPLATE: &str = "Generate a {section} for a resume based on the following information:\n{input}\n\nRespond with the section text only.";

const PROFESSIONAL_SUMMARY_TEMPLATE: &str = "Write a professional summary for {name}, who is a {job_title} with {years} years of experience. The candidate is skilled in {skills}.";
