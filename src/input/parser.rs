//! Validating parser for raw resume input
//!
//! Turns the loosely structured JSON a user supplies into [`ResumeData`],
//! rejecting missing or malformed fields with a message naming the field.

use crate::error::{Result, ResumeForgeError};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub const REQUIRED_FIELDS: [&str; 5] = ["name", "email", "phone", "experience", "education"];
pub const PRESENT: &str = "Present";
pub const SUMMARY_PLACEHOLDER: &str = "Not Provided";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub career_summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub hobbies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub graduation_year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

impl ResumeData {
    pub fn has_summary(&self) -> bool {
        self.career_summary != SUMMARY_PLACEHOLDER && !self.career_summary.is_empty()
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("Invalid email regex")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?\d{9,15}$").expect("Invalid phone regex"))
}

fn validation(message: impl Into<String>) -> ResumeForgeError {
    ResumeForgeError::Validation(message.into())
}

/// Trim surrounding whitespace
pub fn sanitize_input(value: &str) -> String {
    value.trim().to_string()
}

/// Check an email address; the domain part is lowercased
pub fn validate_email_address(email: &str) -> Result<String> {
    let email = email.trim();
    if !email_regex().is_match(email) {
        return Err(validation(format!("Invalid email format: {}", email)));
    }
    let (local, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| validation(format!("Invalid email format: {}", email)))?;
    Ok(format!("{}@{}", local, domain.to_lowercase()))
}

/// Check a phone number after removing common separators
pub fn validate_phone_number(phone: &str) -> Result<String> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if !phone_regex().is_match(&cleaned) {
        return Err(validation(format!("Invalid phone number format: {}", phone.trim())));
    }
    Ok(cleaned)
}

/// Check a `YYYY-MM` month
pub fn validate_month(date: &str) -> Result<NaiveDate> {
    let date = date.trim();
    let well_formed = date.len() == 7 && date.as_bytes()[4] == b'-';
    well_formed
        .then(|| NaiveDate::parse_from_str(&format!("{}-01", date), "%Y-%m-%d").ok())
        .flatten()
        .ok_or_else(|| validation(format!("Invalid date format for {}, expected YYYY-MM", date)))
}

/// Check a `YYYY` year
pub fn validate_year(year: &str) -> Result<String> {
    let year = year.trim();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Ok(year.to_string())
    } else {
        Err(validation(format!("Invalid date format for {}, expected YYYY", year)))
    }
}

fn required_str(object: &Map<String, Value>, field: &str, context: &str) -> Result<String> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(sanitize_input(value)),
        Some(Value::Null) | None => Err(validation(format!("{} requires '{}'", context, field))),
        Some(_) => Err(validation(format!("{} field '{}' must be a string", context, field))),
    }
}

fn optional_str(object: &Map<String, Value>, field: &str, context: &str) -> Result<Option<String>> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(Some(sanitize_input(value))),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(validation(format!("{} field '{}' must be a string", context, field))),
    }
}

fn string_list(value: Option<&Value>, field: &str) -> Result<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(sanitize_input(s)),
                _ => Err(validation(format!("'{}' entries must be strings", field))),
            })
            .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
            .collect(),
        Some(_) => Err(validation(format!("'{}' must be a list", field))),
    }
}

fn object_list<'a>(value: Option<&'a Value>, field: &str) -> Result<Vec<&'a Map<String, Value>>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| validation(format!("'{}' entries must be objects", field)))
            })
            .collect(),
        Some(_) => Err(validation(format!("'{}' must be a list", field))),
    }
}

/// Parse and validate work experience entries
pub fn parse_experience(value: Option<&Value>) -> Result<Vec<Experience>> {
    object_list(value, "experience")?
        .into_iter()
        .map(|entry| {
            let context = "Work experience";
            for key in ["company", "role", "start_date"] {
                if !entry.contains_key(key) {
                    return Err(validation(
                        "Work experience requires 'company', 'role', and 'start_date'",
                    ));
                }
            }

            let company = required_str(entry, "company", context)?;
            let role = required_str(entry, "role", context)?;
            let start_date = required_str(entry, "start_date", context)?;
            let start = validate_month(&start_date)?;

            let end_date = match optional_str(entry, "end_date", context)? {
                None => PRESENT.to_string(),
                Some(end) if end.eq_ignore_ascii_case(PRESENT) => PRESENT.to_string(),
                Some(end) => {
                    if validate_month(&end)? < start {
                        return Err(validation(format!(
                            "End date {} is before start date {} at {}",
                            end, start_date, company
                        )));
                    }
                    end
                }
            };

            Ok(Experience {
                company,
                role,
                start_date,
                end_date,
                description: optional_str(entry, "description", context)?.filter(|d| !d.is_empty()),
            })
        })
        .collect()
}

/// Parse and validate education entries
pub fn parse_education(value: Option<&Value>) -> Result<Vec<Education>> {
    object_list(value, "education")?
        .into_iter()
        .map(|entry| {
            let context = "Education";
            for key in ["institution", "degree", "graduation_year"] {
                if !entry.contains_key(key) {
                    return Err(validation(
                        "Education requires 'institution', 'degree', and 'graduation_year'",
                    ));
                }
            }

            let graduation_year = match entry.get("graduation_year") {
                Some(Value::String(year)) => validate_year(year)?,
                Some(Value::Number(year)) => validate_year(&year.to_string())?,
                _ => return Err(validation("Education field 'graduation_year' must be a year")),
            };

            Ok(Education {
                institution: required_str(entry, "institution", context)?,
                degree: required_str(entry, "degree", context)?,
                graduation_year,
            })
        })
        .collect()
}

fn parse_projects(value: Option<&Value>) -> Result<Vec<Project>> {
    object_list(value, "projects")?
        .into_iter()
        .map(|entry| {
            let context = "Project";
            Ok(Project {
                title: required_str(entry, "title", context)?,
                description: optional_str(entry, "description", context)?.unwrap_or_default(),
                technologies: string_list(entry.get("technologies"), "technologies")?,
            })
        })
        .collect()
}

fn parse_certifications(value: Option<&Value>) -> Result<Vec<Certification>> {
    object_list(value, "certifications")?
        .into_iter()
        .map(|entry| {
            let context = "Certification";
            let date = required_str(entry, "date", context)?;
            validate_month(&date)?;
            Ok(Certification {
                name: required_str(entry, "name", context)?,
                issuer: required_str(entry, "issuer", context)?,
                date,
            })
        })
        .collect()
}

/// Parse and validate the entire resume input
pub fn parse_resume_input(raw: &Value) -> Result<ResumeData> {
    let data = raw
        .as_object()
        .ok_or_else(|| validation("Resume input must be a JSON object"))?;

    for field in REQUIRED_FIELDS {
        if !data.contains_key(field) {
            return Err(validation(format!("Missing required field: {}", field)));
        }
    }

    let context = "Resume";
    let name = required_str(data, "name", context)?;
    if name.is_empty() {
        return Err(validation("Name must not be empty"));
    }
    let email = validate_email_address(&required_str(data, "email", context)?)?;
    let phone = validate_phone_number(&required_str(data, "phone", context)?)?;

    let career_summary = optional_str(data, "career_summary", context)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string());

    Ok(ResumeData {
        name,
        email,
        phone,
        career_summary,
        experience: parse_experience(data.get("experience"))?,
        education: parse_education(data.get("education"))?,
        skills: string_list(data.get("skills"), "skills")?,
        projects: parse_projects(data.get("projects"))?,
        certifications: parse_certifications(data.get("certifications"))?,
        hobbies: string_list(data.get("hobbies"), "hobbies")?,
    })
}
