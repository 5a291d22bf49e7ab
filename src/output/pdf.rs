//! PDF export of the plain-text resume rendering

use crate::error::{Result, ResumeForgeError};
use crate::input::parser::ResumeData;
use crate::output::template::TemplateRenderer;
use log::{debug, info};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const BODY_FONT_SIZE: f32 = 10.0;
const TITLE_FONT_SIZE: f32 = 16.0;

/// Roughly what fits across an A4 page in 10pt Helvetica
pub const DEFAULT_LINE_WIDTH: usize = 95;

/// Greedy word wrap; long words are split rather than overflowing
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split wrapped text into pages of `lines_per_page` lines
pub fn paginate(text: &str, width: usize, lines_per_page: usize) -> Vec<Vec<String>> {
    let lines: Vec<String> = text.lines().flat_map(|line| wrap_line(line, width)).collect();
    if lines.is_empty() {
        return vec![Vec::new()];
    }
    lines
        .chunks(lines_per_page.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

fn lines_per_page() -> usize {
    ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM) as usize
}

fn pdf_error(e: printpdf::Error) -> ResumeForgeError {
    ResumeForgeError::PdfExport(e.to_string())
}

pub struct PdfExporter {
    renderer: TemplateRenderer,
    line_width: usize,
}

impl PdfExporter {
    pub fn new() -> Self {
        Self {
            renderer: TemplateRenderer::new(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Write `data` as an A4 PDF at `path`, returning the page count
    pub fn export(&self, data: &ResumeData, path: &Path) -> Result<usize> {
        let text = self.renderer.to_plain_text(data)?;
        let pages = paginate(&text, self.line_width, lines_per_page());

        let title = format!("{} - Resume", data.name);
        let (doc, first_page, first_layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let body_font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let title_font = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), format!("Layer {}", index + 1))
            };
            Self::write_page(&doc, page, layer, lines, index == 0, &body_font, &title_font);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        doc.save(&mut writer).map_err(pdf_error)?;

        info!("Exported {} page(s) to {}", pages.len(), path.display());
        Ok(pages.len())
    }

    fn write_page(
        doc: &PdfDocumentReference,
        page: printpdf::PdfPageIndex,
        layer: printpdf::PdfLayerIndex,
        lines: &[String],
        first_page: bool,
        body_font: &IndirectFontRef,
        title_font: &IndirectFontRef,
    ) {
        let layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

        for (index, line) in lines.iter().enumerate() {
            if first_page && index == 0 {
                layer.use_text(line.clone(), TITLE_FONT_SIZE, Mm(MARGIN_MM), Mm(y), title_font);
                y -= LINE_HEIGHT_MM * 1.5;
                continue;
            }
            if !line.is_empty() {
                layer.use_text(line.clone(), BODY_FONT_SIZE, Mm(MARGIN_MM), Mm(y), body_font);
            }
            y -= LINE_HEIGHT_MM;
        }
        debug!("Wrote {} lines to page", lines.len());
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parser::Education;
    use tempfile::TempDir;

    #[test]
    fn test_wrap_line() {
        assert_eq!(wrap_line("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_line("", 10), vec![""]);
        assert_eq!(wrap_line("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_line("a b c d e f g h", 3).iter().all(|l| l.chars().count() <= 3));
    }

    #[test]
    fn test_paginate() {
        let text = (0..25).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let pages = paginate(&text, 80, 10);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].len(), 5);
        assert_eq!(paginate("", 80, 10), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("resume.pdf");

        let data = ResumeData {
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+15551234567".to_string(),
            career_summary: "Engineer. ".repeat(200),
            experience: vec![],
            education: vec![Education {
                institution: "XYZ University".to_string(),
                degree: "B.Sc.".to_string(),
                graduation_year: "2018".to_string(),
            }],
            skills: vec!["Rust".to_string()],
            projects: vec![],
            certifications: vec![],
            hobbies: vec![],
        };

        let pages = PdfExporter::new().with_line_width(20).export(&data, &path).unwrap();
        assert!(pages > 1);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
