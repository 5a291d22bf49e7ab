//! Resume templates rendered with askama
//!
//! Each built-in template receives a view of the resume whose strings are already
//! escaped for the target format (LaTeX escaping is done here, HTML escaping
//! by askama itself).

use crate::error::{Result, ResumeForgeError};
use crate::input::parser::ResumeData;
use askama::Template;
use log::debug;
use serde::{Deserialize, Serialize};

/// Built-in template identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Modern,
    Markdown,
    Html,
    Plain,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Modern,
        TemplateKind::Markdown,
        TemplateKind::Html,
        TemplateKind::Plain,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TemplateKind::Modern => "modern",
            TemplateKind::Markdown => "markdown",
            TemplateKind::Html => "html",
            TemplateKind::Plain => "plain",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TemplateKind::Modern => "tex",
            TemplateKind::Markdown => "md",
            TemplateKind::Html => "html",
            TemplateKind::Plain => "txt",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateKind::Modern => "LaTeX article with section rules",
            TemplateKind::Markdown => "Markdown document",
            TemplateKind::Html => "Standalone HTML page",
            TemplateKind::Plain => "Plain text, also used for PDF export and scoring",
        }
    }

    /// Resolve a template id, accepting file names such as `modern_resume.tex`
    pub fn from_id(id: &str) -> Result<Self> {
        let normalized = id
            .trim()
            .to_lowercase()
            .trim_end_matches(".tex")
            .trim_end_matches("_resume")
            .to_string();

        let alias = match normalized.as_str() {
            "latex" | "tex" => Some(TemplateKind::Modern),
            "md" => Some(TemplateKind::Markdown),
            "text" | "txt" => Some(TemplateKind::Plain),
            _ => None,
        };

        alias
            .or_else(|| Self::ALL.into_iter().find(|kind| kind.id() == normalized))
            .ok_or_else(|| {
                let suggestion = Self::suggest(&normalized);
                ResumeForgeError::TemplateNotFound(match suggestion {
                    Some(kind) => format!("'{}' (did you mean '{}'?)", id, kind.id()),
                    None => format!("'{}'", id),
                })
            })
    }

    fn suggest(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .map(|kind| (kind, strsim::levenshtein(id, kind.id())))
            .filter(|(_, distance)| *distance <= 3)
            .min_by_key(|(_, distance)| *distance)
            .map(|(kind, _)| kind)
    }
}

/// Output of a template render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub template: TemplateKind,
    pub content: String,
}

impl RenderedDocument {
    pub fn extension(&self) -> &'static str {
        self.template.extension()
    }
}

#[derive(Debug, Clone)]
struct ExperienceView {
    role: String,
    company: String,
    period: String,
    description: String,
    has_description: bool,
}

#[derive(Debug, Clone)]
struct EducationView {
    degree: String,
    institution: String,
    year: String,
}

#[derive(Debug, Clone)]
struct ProjectView {
    title: String,
    description: String,
    technologies: String,
    has_technologies: bool,
}

#[derive(Debug, Clone)]
struct CertificationView {
    name: String,
    issuer: String,
    date: String,
}

/// Template-facing copy of the resume with every string escaped
#[derive(Debug, Clone)]
struct ResumeView {
    name: String,
    email: String,
    phone: String,
    summary: String,
    has_summary: bool,
    experience: Vec<ExperienceView>,
    has_experience: bool,
    education: Vec<EducationView>,
    has_education: bool,
    skills: String,
    has_skills: bool,
    projects: Vec<ProjectView>,
    has_projects: bool,
    certifications: Vec<CertificationView>,
    has_certifications: bool,
    hobbies: String,
    has_hobbies: bool,
}

impl ResumeView {
    fn build(data: &ResumeData, escape: fn(&str) -> String) -> Self {
        let join = |items: &[String]| escape(&items.join(", "));

        Self {
            name: escape(&data.name),
            email: escape(&data.email),
            phone: escape(&data.phone),
            summary: escape(&data.career_summary),
            has_summary: data.has_summary(),
            experience: data
                .experience
                .iter()
                .map(|exp| ExperienceView {
                    role: escape(&exp.role),
                    company: escape(&exp.company),
                    period: escape(&format!("{} - {}", exp.start_date, exp.end_date)),
                    description: exp.description.as_deref().map(escape).unwrap_or_default(),
                    has_description: exp.description.is_some(),
                })
                .collect(),
            has_experience: !data.experience.is_empty(),
            education: data
                .education
                .iter()
                .map(|edu| EducationView {
                    degree: escape(&edu.degree),
                    institution: escape(&edu.institution),
                    year: escape(&edu.graduation_year),
                })
                .collect(),
            has_education: !data.education.is_empty(),
            skills: join(&data.skills),
            has_skills: !data.skills.is_empty(),
            projects: data
                .projects
                .iter()
                .map(|project| ProjectView {
                    title: escape(&project.title),
                    description: escape(&project.description),
                    technologies: join(&project.technologies),
                    has_technologies: !project.technologies.is_empty(),
                })
                .collect(),
            has_projects: !data.projects.is_empty(),
            certifications: data
                .certifications
                .iter()
                .map(|cert| CertificationView {
                    name: escape(&cert.name),
                    issuer: escape(&cert.issuer),
                    date: escape(&cert.date),
                })
                .collect(),
            has_certifications: !data.certifications.is_empty(),
            hobbies: join(&data.hobbies),
            has_hobbies: !data.hobbies.is_empty(),
        }
    }
}

/// Escape LaTeX special characters
pub fn latex_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn verbatim(text: &str) -> String {
    text.to_string()
}

#[derive(Template)]
#[template(
    source = r#"\documentclass[11pt]{article}
\usepackage[margin=0.8in]{geometry}
\usepackage[T1]{fontenc}
\usepackage{titlesec}
\titleformat{\section}{\large\bfseries}{}{0em}{}[\titlerule]
\pagestyle{empty}

\begin{document}

\begin{center}
{\LARGE\bfseries {{ r.name -}} }\\[4pt]
Email: {{ r.email }} \quad Phone: {{ r.phone }}
\end{center}
{% if r.has_summary %}
\section*{Career Summary}
{{ r.summary }}
{% endif %}{% if r.has_experience %}
\section*{Work Experience}
{% for job in r.experience %}
\textbf{ {{- job.role -}} } at {{ job.company }} \hfill {{ job.period }}\\
{% if job.has_description %}{{ job.description }}
{% endif %}
{% endfor %}{% endif %}{% if r.has_education %}
\section*{Education}
{% for edu in r.education %}
\textbf{ {{- edu.degree -}} }, {{ edu.institution }} \hfill {{ edu.year }}\\
{% endfor %}{% endif %}{% if r.has_skills %}
\section*{Skills}
{{ r.skills }}
{% endif %}{% if r.has_projects %}
\section*{Projects}
{% for project in r.projects %}
\textbf{ {{- project.title -}} }: {{ project.description }}{% if project.has_technologies %} (\emph{ {{- project.technologies -}} }){% endif %}\\
{% endfor %}{% endif %}{% if r.has_certifications %}
\section*{Certifications}
{% for cert in r.certifications %}
{{ cert.name }}, {{ cert.issuer }} \hfill {{ cert.date }}\\
{% endfor %}{% endif %}{% if r.has_hobbies %}
\section*{Hobbies}
{{ r.hobbies }}
{% endif %}
\end{document}
"#,
    ext = "txt"
)]
struct ModernTemplate<'a> {
    r: &'a ResumeView,
}

#[derive(Template)]
#[template(
    source = r#"# {{ r.name }}

**Email:** {{ r.email }} | **Phone:** {{ r.phone }}
{% if r.has_summary %}
## Career Summary

{{ r.summary }}
{% endif %}{% if r.has_experience %}
## Work Experience
{% for job in r.experience %}
### {{ job.role }} at {{ job.company }}
_{{ job.period }}_
{% if job.has_description %}
{{ job.description }}
{% endif %}{% endfor %}{% endif %}{% if r.has_education %}
## Education
{% for edu in r.education %}
- **{{ edu.degree }}**, {{ edu.institution }} ({{ edu.year }})
{%- endfor %}
{% endif %}{% if r.has_skills %}
## Skills

{{ r.skills }}
{% endif %}{% if r.has_projects %}
## Projects
{% for project in r.projects %}
- **{{ project.title }}**: {{ project.description }}{% if project.has_technologies %} ({{ project.technologies }}){% endif %}
{%- endfor %}
{% endif %}{% if r.has_certifications %}
## Certifications
{% for cert in r.certifications %}
- {{ cert.name }}, {{ cert.issuer }} ({{ cert.date }})
{%- endfor %}
{% endif %}{% if r.has_hobbies %}
## Hobbies

{{ r.hobbies }}
{% endif %}"#,
    ext = "txt"
)]
struct MarkdownTemplate<'a> {
    r: &'a ResumeView,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{{ r.name }} - Resume</title>
    <style>
        body { font-family: Helvetica, Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 24px; color: #222; }
        h1 { margin-bottom: 4px; }
        h2 { border-bottom: 2px solid #007acc; color: #007acc; padding-bottom: 2px; }
        .contact { color: #555; }
        .period { float: right; color: #555; }
    </style>
</head>
<body>
    <h1>{{ r.name }}</h1>
    <p class="contact">Email: {{ r.email }} | Phone: {{ r.phone }}</p>
    {% if r.has_summary %}
    <h2>Career Summary</h2>
    <p>{{ r.summary }}</p>
    {% endif %}
    {% if r.has_experience %}
    <h2>Work Experience</h2>
    {% for job in r.experience %}
    <h3>{{ job.role }} at {{ job.company }} <span class="period">{{ job.period }}</span></h3>
    {% if job.has_description %}<p>{{ job.description }}</p>{% endif %}
    {% endfor %}
    {% endif %}
    {% if r.has_education %}
    <h2>Education</h2>
    <ul>
    {% for edu in r.education %}
        <li><strong>{{ edu.degree }}</strong>, {{ edu.institution }} ({{ edu.year }})</li>
    {% endfor %}
    </ul>
    {% endif %}
    {% if r.has_skills %}
    <h2>Skills</h2>
    <p>{{ r.skills }}</p>
    {% endif %}
    {% if r.has_projects %}
    <h2>Projects</h2>
    <ul>
    {% for project in r.projects %}
        <li><strong>{{ project.title }}</strong>: {{ project.description }}{% if project.has_technologies %} ({{ project.technologies }}){% endif %}</li>
    {% endfor %}
    </ul>
    {% endif %}
    {% if r.has_certifications %}
    <h2>Certifications</h2>
    <ul>
    {% for cert in r.certifications %}
        <li>{{ cert.name }}, {{ cert.issuer }} ({{ cert.date }})</li>
    {% endfor %}
    </ul>
    {% endif %}
    {% if r.has_hobbies %}
    <h2>Hobbies</h2>
    <p>{{ r.hobbies }}</p>
    {% endif %}
</body>
</html>
"#,
    ext = "html"
)]
struct HtmlTemplate<'a> {
    r: &'a ResumeView,
}

#[derive(Template)]
#[template(
    source = r#"{{ r.name }}
Email: {{ r.email }}
Phone: {{ r.phone }}
{% if r.has_summary %}
Career Summary
{{ r.summary }}
{% endif %}{% if r.has_experience %}
Work Experience
{% for job in r.experience %}{{ job.role }} at {{ job.company }} ({{ job.period }})
{% if job.has_description %}{{ job.description }}
{% endif %}{% endfor %}{% endif %}{% if r.has_education %}
Education
{% for edu in r.education %}{{ edu.degree }}, {{ edu.institution }} ({{ edu.year }})
{% endfor %}{% endif %}{% if r.has_skills %}
Skills
{{ r.skills }}
{% endif %}{% if r.has_projects %}
Projects
{% for project in r.projects %}{{ project.title }}: {{ project.description }}{% if project.has_technologies %} ({{ project.technologies }}){% endif %}
{% endfor %}{% endif %}{% if r.has_certifications %}
Certifications
{% for cert in r.certifications %}{{ cert.name }}, {{ cert.issuer }} ({{ cert.date }})
{% endfor %}{% endif %}{% if r.has_hobbies %}
Hobbies
{{ r.hobbies }}
{% endif %}"#,
    ext = "txt"
)]
struct PlainTemplate<'a> {
    r: &'a ResumeView,
}

/// Renders resume data through the built-in templates
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn list_templates(&self) -> Vec<TemplateKind> {
        TemplateKind::ALL.to_vec()
    }

    /// Render `data` with the template named `template_id`
    pub fn render(&self, template_id: &str, data: &ResumeData) -> Result<RenderedDocument> {
        let kind = TemplateKind::from_id(template_id)?;
        self.render_kind(kind, data)
    }

    pub fn render_kind(&self, kind: TemplateKind, data: &ResumeData) -> Result<RenderedDocument> {
        let content = match kind {
            TemplateKind::Modern => {
                let view = ResumeView::build(data, latex_escape);
                ModernTemplate { r: &view }.render()?
            }
            TemplateKind::Markdown => {
                let view = ResumeView::build(data, verbatim);
                MarkdownTemplate { r: &view }.render()?
            }
            TemplateKind::Html => {
                let view = ResumeView::build(data, verbatim);
                HtmlTemplate { r: &view }.render()?
            }
            TemplateKind::Plain => {
                let view = ResumeView::build(data, verbatim);
                PlainTemplate { r: &view }.render()?
            }
        };

        debug!("Rendered template '{}' ({} characters)", kind.id(), content.len());
        Ok(RenderedDocument { template: kind, content })
    }

    /// Plain text rendering used for PDF export and scoring
    pub fn to_plain_text(&self, data: &ResumeData) -> Result<String> {
        Ok(self.render_kind(TemplateKind::Plain, data)?.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parser::{Education, Experience, Project};

    fn resume() -> ResumeData {
        ResumeData {
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+15551234567".to_string(),
            career_summary: "Engineer focused on R&D, 100% uptime".to_string(),
            experience: vec![Experience {
                company: "Acme_Corp".to_string(),
                role: "Staff Engineer".to_string(),
                start_date: "2020-01".to_string(),
                end_date: "Present".to_string(),
                description: Some("Led <platform> work".to_string()),
            }],
            education: vec![Education {
                institution: "XYZ University".to_string(),
                degree: "B.Sc. Computer Science".to_string(),
                graduation_year: "2018".to_string(),
            }],
            skills: vec!["Python".to_string(), "Rust".to_string()],
            projects: vec![Project {
                title: "forge".to_string(),
                description: "Resume tooling".to_string(),
                technologies: vec!["Rust".to_string()],
            }],
            certifications: vec![],
            hobbies: vec![],
        }
    }

    #[test]
    fn test_every_template_has_name_and_sections() {
        let renderer = TemplateRenderer::new();
        for kind in renderer.list_templates() {
            let doc = renderer.render_kind(kind, &resume()).unwrap();
            assert!(doc.content.contains("Jane Roe"), "{:?}", kind);
            assert!(doc.content.contains("Work Experience"), "{:?}", kind);
            assert!(doc.content.contains("Education"), "{:?}", kind);
            assert!(doc.content.contains("Skills"), "{:?}", kind);
            assert!(doc.content.contains("Email"), "{:?}", kind);
            assert!(doc.content.contains("Phone"), "{:?}", kind);
            assert!(!doc.content.contains("Certifications"), "{:?}", kind);
        }
    }

    #[test]
    fn test_latex_escaping() {
        assert_eq!(latex_escape("R&D 100% #1 a_b"), r"R\&D 100\% \#1 a\_b");
        assert_eq!(latex_escape(r"x\y"), r"x\textbackslash{}y");

        let doc = TemplateRenderer::new().render("modern", &resume()).unwrap();
        assert!(doc.content.contains(r"R\&D, 100\% uptime"));
        assert!(doc.content.contains(r"Acme\_Corp"));
        assert!(doc.content.contains(r"{\LARGE\bfseries Jane Roe}"));
        assert!(doc.content.contains(r"\textbf{Staff Engineer} at"));
        assert!(doc.content.starts_with(r"\documentclass"));
    }

    #[test]
    fn test_html_is_escaped() {
        let doc = TemplateRenderer::new().render("html", &resume()).unwrap();
        assert!(doc.content.contains("Led &#60;platform&#62; work") || doc.content.contains("Led &lt;platform&gt; work"));
        assert!(!doc.content.contains("<platform>"));
    }

    #[test]
    fn test_plain_text_has_no_markup() {
        let text = TemplateRenderer::new().to_plain_text(&resume()).unwrap();
        assert!(text.starts_with("Jane Roe\nEmail: jane@example.com\nPhone: +15551234567"));
        assert!(text.contains("Staff Engineer at Acme_Corp (2020-01 - Present)"));
        assert!(text.contains("Python, Rust"));
    }

    #[test]
    fn test_template_aliases() {
        assert_eq!(TemplateKind::from_id("modern_resume.tex").unwrap(), TemplateKind::Modern);
        assert_eq!(TemplateKind::from_id("LaTeX").unwrap(), TemplateKind::Modern);
        assert_eq!(TemplateKind::from_id("md").unwrap(), TemplateKind::Markdown);
        assert_eq!(TemplateKind::from_id(" Plain ").unwrap(), TemplateKind::Plain);
    }

    #[test]
    fn test_unknown_template_suggests_nearest() {
        let err = TemplateKind::from_id("modrn").unwrap_err();
        assert!(matches!(&err, ResumeForgeError::TemplateNotFound(msg) if msg.contains("did you mean 'modern'")));

        let err = TemplateKind::from_id("docx-fancy-layout").unwrap_err();
        assert!(!err.to_string().contains("did you mean"));
    }

    #[test]
    fn test_summary_placeholder_omitted() {
        let mut data = resume();
        data.career_summary = crate::input::parser::SUMMARY_PLACEHOLDER.to_string();
        let text = TemplateRenderer::new().to_plain_text(&data).unwrap();
        assert!(!text.contains("Career Summary"));
    }
}
