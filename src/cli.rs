//! CLI interface for resume-forge

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-forge")]
#[command(about = "Build resumes from structured input and score them against job descriptions")]
#[command(long_about = "Render resumes through LaTeX, Markdown, HTML or PDF templates, optionally expand their prose with a hosted language model, and rank resumes by keyword relevance, structure and TF-IDF similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a resume from a JSON input file
    Generate {
        /// Path to the resume input (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Template id: modern, markdown, html, plain
        #[arg(short, long)]
        template: Option<String>,

        /// Path to a job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Where to write the resume; a .pdf path exports a PDF
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format: console, json, markdown
        #[arg(short, long)]
        format: Option<String>,

        /// Skip language model text expansion
        #[arg(long)]
        no_expand: bool,

        /// Save the rendered resume under this version name
        #[arg(long)]
        save_version: Option<String>,

        /// Write the report to a file (or a generated file name inside a directory) instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Rank one or more resumes, best first
    Rank {
        /// Resume files (PDF, TXT, MD, TEX)
        #[arg(short, long, required = true, num_args = 1..)]
        resume: Vec<PathBuf>,

        /// Path to a job description file
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Report format: console, json, markdown
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Heuristic check of a single resume, no job description needed
    Score {
        /// Resume file (PDF, TXT, MD, TEX)
        file: PathBuf,

        /// Report format: console, json, markdown
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List built-in templates
    Templates,

    /// Saved resume versions
    Versions {
        #[command(subcommand)]
        action: VersionAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum VersionAction {
    /// List saved versions, newest first
    List,

    /// Print a saved version
    Show {
        /// Version name
        name: String,
    },

    /// Delete a saved version
    Delete {
        /// Version name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
