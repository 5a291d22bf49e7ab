//! End-to-end resume generation: parse, expand, render, score

use crate::error::Result;
use crate::input::parser::ResumeData;
use crate::input::InputManager;
use crate::llm::{ResumeEnhancer, TextExpander};
use crate::output::report::{ReportMetadata, ResumeReport};
use crate::output::template::{RenderedDocument, TemplateKind, TemplateRenderer};
use crate::output::PdfExporter;
use crate::processing::heuristic;
use crate::processing::ranking::RankingService;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template: String,
    pub job_description: Option<String>,
    /// `.pdf` exports through printpdf, anything else receives the rendered text
    pub output: Option<PathBuf>,
    pub expand: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            template: TemplateKind::Modern.id().to_string(),
            job_description: None,
            output: None,
            expand: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedResume {
    /// Resume data after expansion
    pub data: ResumeData,
    pub document: RenderedDocument,
    pub report: ResumeReport,
}

/// Score one resume text. Without a ranking service only the heuristic runs.
pub fn score_document(candidate: &str, text: &str, ranking: Option<&RankingService>) -> ResumeReport {
    let started = Instant::now();
    let heuristic = heuristic::breakdown(text);

    let (ranking_result, missing_keywords) = match ranking {
        Some(service) => (Some(service.rank(text)), service.missing_keywords(text)),
        None => (None, Vec::new()),
    };
    let job_description_provided = ranking.and_then(RankingService::job_description).is_some();

    ResumeReport {
        candidate: candidate.to_string(),
        template: None,
        heuristic,
        ranking: ranking_result,
        missing_keywords,
        enhancement: None,
        output_path: None,
        metadata: ReportMetadata::new(started.elapsed().as_millis() as u64, job_description_provided),
    }
}

pub struct ResumeGenerator<E> {
    input_manager: InputManager,
    renderer: TemplateRenderer,
    exporter: PdfExporter,
    enhancer: Option<ResumeEnhancer<E>>,
}

impl<E: TextExpander> ResumeGenerator<E> {
    pub fn new(enhancer: Option<ResumeEnhancer<E>>) -> Self {
        Self {
            input_manager: InputManager::new(),
            renderer: TemplateRenderer::new(),
            exporter: PdfExporter::new(),
            enhancer,
        }
    }

    pub fn has_expander(&self) -> bool {
        self.enhancer.is_some()
    }

    /// Load a JSON resume input file and generate from it
    pub async fn generate_from_path(&mut self, input: &Path, options: &GenerateOptions) -> Result<GeneratedResume> {
        let data = self.input_manager.load_resume_input(input).await?;
        self.generate(data, options).await
    }

    pub async fn generate(&self, mut data: ResumeData, options: &GenerateOptions) -> Result<GeneratedResume> {
        let started = Instant::now();
        let template = TemplateKind::from_id(&options.template)?;

        let enhancement = match (&self.enhancer, options.expand) {
            (Some(enhancer), true) => Some(enhancer.enhance(&mut data).await),
            (None, true) => {
                debug!("No text expander configured, using resume text as written");
                None
            }
            (_, false) => None,
        };

        let document = self.renderer.render_kind(template, &data)?;
        let scored_text = match &options.output {
            Some(path) if is_pdf(path) => {
                self.exporter.export(&data, path)?;
                self.renderer.to_plain_text(&data)?
            }
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &document.content)?;
                info!("Wrote {} resume to {}", template.id(), path.display());
                document.content.clone()
            }
            None => document.content.clone(),
        };

        let ranking = RankingService::new(options.job_description.clone());
        let mut report = score_document(&data.name, &scored_text, Some(&ranking));
        report.template = Some(template);
        report.enhancement = enhancement;
        report.output_path = options.output.clone();
        report.metadata.processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            "Generated resume for {} (heuristic {}/100)",
            data.name, report.heuristic.score
        );

        Ok(GeneratedResume {
            data,
            document,
            report,
        })
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
