//! Error handling for the resume forge application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Template rendering error: {0}")]
    Template(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Text expansion error: {0}")]
    Expansion(String),

    #[error("PDF export error: {0}")]
    PdfExport(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),
}

pub type Result<T> = std::result::Result<T, ResumeForgeError>;

/// Convert askama render failures to our custom error type
impl From<askama::Error> for ResumeForgeError {
    fn from(err: askama::Error) -> Self {
        ResumeForgeError::Template(err.to_string())
    }
}
