//! Saved resume versions on disk
//!
//! Each version is a rendered document plus a JSON metadata sidecar:
//!
//! ```text
//! <dir>/<name>.<ext>
//! <dir>/<name>.json
//! ```

use crate::error::{Result, ResumeForgeError};
use crate::output::template::{RenderedDocument, TemplateKind};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionMetadata {
    pub name: String,
    pub template: TemplateKind,
    pub file_name: String,
    pub saved_at: DateTime<Utc>,
    pub heuristic_score: Option<u8>,
    pub overall_score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SavedVersion {
    pub metadata: VersionMetadata,
    pub content: String,
}

/// Keep names to `[A-Za-z0-9_-]` so they are safe as file stems
pub fn sanitize_version_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let sanitized = sanitized.trim_matches('_').to_string();
    if sanitized.is_empty() {
        "resume".to_string()
    } else {
        sanitized
    }
}

pub struct VersionStore {
    dir: PathBuf,
}

impl VersionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Store a rendered document, overwriting any version with the same name
    pub fn save(
        &self,
        name: &str,
        document: &RenderedDocument,
        heuristic_score: Option<u8>,
        overall_score: Option<f64>,
    ) -> Result<VersionMetadata> {
        let name = sanitize_version_name(name);
        fs::create_dir_all(&self.dir)?;

        let file_name = format!("{}.{}", name, document.extension());
        fs::write(self.dir.join(&file_name), &document.content)?;

        let metadata = VersionMetadata {
            name: name.clone(),
            template: document.template,
            file_name,
            saved_at: Utc::now(),
            heuristic_score,
            overall_score,
        };
        fs::write(self.metadata_path(&name), serde_json::to_string_pretty(&metadata)?)?;

        info!("Saved resume version '{}' to {}", name, self.dir.display());
        Ok(metadata)
    }

    pub fn load(&self, name: &str) -> Result<SavedVersion> {
        let name = sanitize_version_name(name);
        let metadata_path = self.metadata_path(&name);
        if !metadata_path.exists() {
            return Err(ResumeForgeError::VersionNotFound(name));
        }

        let metadata: VersionMetadata = serde_json::from_str(&fs::read_to_string(&metadata_path)?)?;
        let content = fs::read_to_string(self.dir.join(&metadata.file_name))?;
        debug!("Loaded version '{}' ({} characters)", name, content.len());

        Ok(SavedVersion { metadata, content })
    }

    /// All saved versions, newest first
    pub fn list(&self) -> Result<Vec<VersionMetadata>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(raw) = fs::read_to_string(&path) else {
                continue;
            };
            match serde_json::from_str::<VersionMetadata>(&raw) {
                Ok(metadata) => versions.push(metadata),
                Err(e) => debug!("Skipping {}: {}", path.display(), e),
            }
        }

        versions.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.name.cmp(&b.name)));
        Ok(versions)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let version = self.load(name)?;
        if let Err(e) = fs::remove_file(self.dir.join(&version.metadata.file_name)) {
            warn!("Could not remove {}: {}", version.metadata.file_name, e);
        }
        fs::remove_file(self.metadata_path(&version.metadata.name))?;
        Ok(())
    }
}
