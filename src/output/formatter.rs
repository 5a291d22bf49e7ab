//! Output formatters for resume and ranking reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{score_percentage, RankingReport, ResumeReport};
use crate::processing::heuristic::HeuristicBreakdown;
use crate::processing::ranking::{Metric, RankingResult};
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub trait OutputFormatter {
    fn format_report(&self, report: &ResumeReport) -> Result<String>;
    fn format_ranking(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

fn badge_for(score: u8) -> (&'static str, Color) {
    match score {
        90..=100 => ("EXCELLENT", Color::Green),
        80..=89 => ("VERY GOOD", Color::BrightGreen),
        70..=79 => ("GOOD", Color::Yellow),
        60..=69 => ("FAIR", Color::BrightYellow),
        50..=59 => ("BELOW AVG", Color::Red),
        _ => ("POOR", Color::BrightRed),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = badge_for(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_ranking_result(&self, output: &mut String, ranking: &RankingResult) {
        let overall = score_percentage(ranking.overall_score);
        let _ = writeln!(
            output,
            "Overall score: {} {}",
            self.colorize(&format!("{:.2}%", ranking.overall_score), badge_for(overall).1),
            self.format_score_badge(overall)
        );

        for metric in Metric::ALL {
            let score = ranking.scores.get(metric);
            let marker = if score < metric.threshold() { "!" } else { " " };
            let _ = writeln!(
                output,
                "  {} {:<18} {:>7.2}  (weight {:.1}, target {:.0})",
                self.colorize(marker, Color::Red),
                metric.label(),
                score,
                metric.weight(),
                metric.threshold()
            );
        }

        output.push_str(&self.format_header("Feedback", 3));
        for message in ranking.feedback.values() {
            let _ = writeln!(output, "  • {}", message);
        }
    }

    fn format_heuristic(&self, output: &mut String, heuristic: &HeuristicBreakdown) {
        let _ = writeln!(
            output,
            "Heuristic score: {} {}",
            self.colorize(&format!("{}/100", heuristic.score), badge_for(heuristic.score).1),
            self.format_score_badge(heuristic.score)
        );

        if self.detailed {
            let _ = writeln!(output, "  Sections:  {:+}", heuristic.section_points);
            let _ = writeln!(
                output,
                "  Length:    {:+} ({} words)",
                heuristic.length_points, heuristic.word_count
            );
            let _ = writeln!(output, "  Keywords:  {:+}", heuristic.keyword_points);
            let _ = writeln!(output, "  Contact:   {:+}", heuristic.contact_points);
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ResumeReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("RESUME REPORT: {}", report.candidate), 1));
        let _ = writeln!(
            output,
            "Generated: {} | Processing time: {}ms",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        );
        if let Some(template) = report.template {
            let _ = writeln!(output, "Template: {}", template.id());
        }
        if let Some(path) = &report.output_path {
            let _ = writeln!(output, "Output: {}", path.display());
        }

        output.push_str(&self.format_header("Heuristic Check", 2));
        self.format_heuristic(&mut output, &report.heuristic);

        if let Some(ranking) = &report.ranking {
            let title = if report.metadata.job_description_provided {
                "Ranking Against Job Description"
            } else {
                "Ranking (no job description)"
            };
            output.push_str(&self.format_header(title, 2));
            self.format_ranking_result(&mut output, ranking);
        }

        if !report.missing_keywords.is_empty() {
            output.push_str(&self.format_header("Missing Keywords", 3));
            let shown = if self.detailed {
                report.missing_keywords.len()
            } else {
                report.missing_keywords.len().min(15)
            };
            let _ = writeln!(
                output,
                "  {}",
                self.colorize(&report.missing_keywords[..shown].join(", "), Color::Yellow)
            );
            if shown < report.missing_keywords.len() {
                let _ = writeln!(output, "  ... and {} more", report.missing_keywords.len() - shown);
            }
        }

        if let Some(enhancement) = &report.enhancement {
            output.push_str(&self.format_header("Text Expansion", 3));
            let color = if enhancement.all_failed() { Color::Red } else { Color::Green };
            let _ = writeln!(
                output,
                "  {}",
                self.colorize(
                    &format!(
                        "{} of {} sections expanded ({} kept as written)",
                        enhancement.expanded, enhancement.attempted, enhancement.failed
                    ),
                    color
                )
            );
        }

        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("RESUME RANKING", 1));

        for (position, candidate) in report.candidates.iter().enumerate() {
            let overall = score_percentage(candidate.result.overall_score);
            let _ = writeln!(
                output,
                "{:>2}. {:<40} {:>7.2} {}",
                position + 1,
                candidate.label,
                candidate.result.overall_score,
                self.format_score_badge(overall)
            );
            if self.detailed {
                for message in candidate.result.feedback.values() {
                    let _ = writeln!(output, "      • {}", message);
                }
            }
        }

        if report.candidates.is_empty() {
            output.push_str("No resumes to rank.\n");
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ResumeReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match score {
            90..=100 => "🟢 Excellent",
            80..=89 => "🟢 Very Good",
            70..=79 => "🟡 Good",
            60..=69 => "🟡 Fair",
            50..=59 => "🟠 Below Average",
            _ => "🔴 Poor",
        }
    }

    fn ranking_table(output: &mut String, ranking: &RankingResult) {
        output.push_str("| Metric | Score | Weight | Target |\n");
        output.push_str("|--------|-------|--------|--------|\n");
        for metric in Metric::ALL {
            let _ = writeln!(
                output,
                "| {} | {:.2} | {:.1} | {:.0} |",
                metric.label(),
                ranking.scores.get(metric),
                metric.weight(),
                metric.threshold()
            );
        }
        let _ = writeln!(output, "| **Overall** | **{:.2}** | | |", ranking.overall_score);

        output.push_str("\n### Feedback\n\n");
        for message in ranking.feedback.values() {
            let _ = writeln!(output, "- {}", message);
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ResumeReport) -> Result<String> {
        let mut output = String::new();

        let _ = writeln!(output, "# Resume Report: {}\n", report.candidate);

        if self.include_metadata {
            let _ = writeln!(
                output,
                "**Generated:** {}  ",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            let _ = writeln!(output, "**Processing Time:** {}ms  ", report.metadata.processing_time_ms);
            if let Some(template) = report.template {
                let _ = writeln!(output, "**Template:** {}  ", template.id());
            }
            if let Some(path) = &report.output_path {
                let _ = writeln!(output, "**Output:** `{}`  ", path.display());
            }
            output.push('\n');
        }

        let heuristic = &report.heuristic;
        output.push_str("## Heuristic Check\n\n");
        let _ = writeln!(
            output,
            "**Score:** {}/100 ({})\n",
            heuristic.score,
            Self::markdown_score_badge(heuristic.score)
        );
        output.push_str("| Component | Points |\n|-----------|--------|\n");
        let _ = writeln!(output, "| Sections | {:+} |", heuristic.section_points);
        let _ = writeln!(
            output,
            "| Length ({} words) | {:+} |",
            heuristic.word_count, heuristic.length_points
        );
        let _ = writeln!(output, "| Keywords | {:+} |", heuristic.keyword_points);
        let _ = writeln!(output, "| Contact | {:+} |\n", heuristic.contact_points);

        if let Some(ranking) = &report.ranking {
            let overall = score_percentage(ranking.overall_score);
            output.push_str("## Ranking\n\n");
            if !report.metadata.job_description_provided {
                output.push_str("_No job description was provided._\n\n");
            }
            let _ = writeln!(
                output,
                "**Overall:** {:.2} ({})\n",
                ranking.overall_score,
                Self::markdown_score_badge(overall)
            );
            Self::ranking_table(&mut output, ranking);
            output.push('\n');
        }

        if !report.missing_keywords.is_empty() {
            output.push_str("## Missing Keywords\n\n");
            let quoted: Vec<String> = report.missing_keywords.iter().map(|k| format!("`{}`", k)).collect();
            let _ = writeln!(output, "{}\n", quoted.join(", "));
        }

        if let Some(enhancement) = &report.enhancement {
            output.push_str("## Text Expansion\n\n");
            let _ = writeln!(
                output,
                "{} of {} sections expanded, {} kept as written.",
                enhancement.expanded, enhancement.attempted, enhancement.failed
            );
        }

        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::from("# Resume Ranking\n\n");
        output.push_str("| Rank | Resume | Overall | Keywords | Formatting | Content |\n");
        output.push_str("|------|--------|---------|----------|------------|---------|\n");

        for (position, candidate) in report.candidates.iter().enumerate() {
            let scores = &candidate.result.scores;
            let _ = writeln!(
                output,
                "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} |",
                position + 1,
                candidate.label,
                candidate.result.overall_score,
                scores.keyword_relevance,
                scores.formatting,
                scores.content_quality
            );
        }

        if self.include_metadata {
            let _ = writeln!(
                output,
                "\n_Generated {} with resume-forge {}_",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.tool_version
            );
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Dispatches reports to the formatter for the requested output format
pub struct ReportFormatter {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn format_report(&self, report: &ResumeReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn format_ranking(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_ranking(report)
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Where to write a report. A directory gets a generated `{stem}_report_{ts}` file name.
pub fn resolve_report_path(destination: &Path, format: OutputFormat, resume_name: &str) -> PathBuf {
    if destination.is_dir() {
        destination.join(suggest_filename(format, resume_name, true))
    } else {
        destination.to_path_buf()
    }
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_report{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::EnhancementSummary;
    use crate::output::report::ReportMetadata;
    use crate::output::template::TemplateKind;
    use crate::processing::heuristic;
    use crate::processing::ranking::{RankedCandidate, RankingService};

    fn report() -> ResumeReport {
        let text = "Experience at Acme. Education at XYZ. Skills: Python.";
        let service = RankingService::with_job_description("Python engineer with Kubernetes");
        ResumeReport {
            candidate: "Jane Roe".to_string(),
            template: Some(TemplateKind::Markdown),
            heuristic: heuristic::breakdown(text),
            ranking: Some(service.rank(text)),
            missing_keywords: service.missing_keywords(text),
            enhancement: Some(EnhancementSummary { attempted: 2, expanded: 0, failed: 2 }),
            output_path: None,
            metadata: ReportMetadata::new(12, true),
        }
    }

    #[test]
    fn test_console_report_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();
        assert!(output.contains("RESUME REPORT: Jane Roe"));
        assert!(output.contains("Template: markdown"));
        assert!(output.contains("Keyword Relevance"));
        assert!(output.contains("kubernetes"));
        assert!(output.contains("0 of 2 sections expanded"));
        assert!(output.contains("words)"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_report_round_trips() {
        let json = JsonFormatter::new(true).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["candidate"], "Jane Roe");
        assert_eq!(value["template"], "markdown");
        assert!(value["ranking"]["scores"]["formatting"].is_number());
        assert!(value["heuristic"]["score"].is_number());
    }

    #[test]
    fn test_markdown_report_sections() {
        let md = MarkdownFormatter::new(false).format_report(&report()).unwrap();
        assert!(md.starts_with("# Resume Report: Jane Roe"));
        assert!(md.contains("## Heuristic Check"));
        assert!(md.contains("| Keyword Relevance |"));
        assert!(md.contains("`kubernetes`"));
        assert!(!md.contains("**Generated:**"));
    }

    #[test]
    fn test_heuristic_only_report_skips_ranking() {
        let mut report = report();
        report.ranking = None;
        report.missing_keywords.clear();

        let output = ReportFormatter::with_options(false, false)
            .format_report(&report, OutputFormat::Console)
            .unwrap();
        assert!(output.contains("Heuristic score"));
        assert!(!output.contains("Overall score"));
    }

    #[test]
    fn test_ranking_output_lists_in_order() {
        let service = RankingService::with_job_description("rust developer");
        let candidates: Vec<RankedCandidate> = service.rank_many(vec![
            ("weak.txt", "nothing relevant"),
            ("strong.txt", "rust developer with experience and education"),
        ]);
        let ranking = RankingReport {
            candidates,
            metadata: ReportMetadata::new(1, true),
        };

        let output = ReportFormatter::with_options(false, false)
            .format_ranking(&ranking, OutputFormat::Console)
            .unwrap();
        let strong = output.find("strong.txt").unwrap();
        let weak = output.find("weak.txt").unwrap();
        assert!(strong < weak);

        let md = MarkdownFormatter::new(true).format_ranking(&ranking).unwrap();
        assert!(md.contains("| 1 | strong.txt |"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "cv/jane.json", false), "jane_report.json");
        assert_eq!(suggest_filename(OutputFormat::Markdown, "jane", false), "jane_report.md");
        assert!(suggest_filename(OutputFormat::Console, "jane.txt", true).starts_with("jane_report_"));
    }

    #[test]
    fn test_resolve_report_path() {
        let dir = tempfile::TempDir::new().unwrap();

        let generated = resolve_report_path(dir.path(), OutputFormat::Markdown, "cv/jane.json");
        assert_eq!(generated.parent(), Some(dir.path()));
        let name = generated.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jane_report_"));
        assert!(name.ends_with(".md"));

        let explicit = dir.path().join("out.json");
        assert_eq!(resolve_report_path(&explicit, OutputFormat::Json, "jane"), explicit);
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("out.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }
}
