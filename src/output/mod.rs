//! Resume rendering, export, version storage and report output

pub mod formatter;
pub mod pdf;
pub mod report;
pub mod template;
pub mod versions;

pub use formatter::ReportFormatter;
pub use pdf::PdfExporter;
pub use report::{RankingReport, ResumeReport};
pub use template::{RenderedDocument, TemplateKind, TemplateRenderer};
pub use versions::VersionStore;
