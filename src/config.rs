//! Configuration management for the resume forge

use crate::error::{Result, ResumeForgeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub templates: TemplateConfig,
    pub expansion: ExpansionConfig,
    pub output: OutputConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub default_template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionConfig {
    pub enabled: bool,
    pub api_url: String,
    pub model_id: String,
    pub temperature: f64,
    pub max_new_tokens: u32,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API token
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub versions_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let versions_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-forge")
            .join("versions");

        Self {
            templates: TemplateConfig {
                default_template: "modern".to_string(),
            },
            expansion: ExpansionConfig {
                enabled: true,
                api_url: "https://api-inference.huggingface.co/models".to_string(),
                model_id: "mistralai/Mistral-7B-Instruct-v0.3".to_string(),
                temperature: 0.7,
                max_new_tokens: 256,
                max_retries: 3,
                timeout_secs: 30,
                api_key_env: "LLM_API_KEY".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
            storage: StorageConfig { versions_dir },
        }
    }
}

impl Config {
    /// Load the config from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_or_init(&Self::config_path())
    }

    /// Load from an explicit file; the file must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResumeForgeError::Configuration(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ResumeForgeError::Configuration(format!("Failed to parse config: {}", e)))
    }

    fn load_or_init(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeForgeError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-forge")
            .join("config.toml")
    }

    /// API token for the expansion backend, if the configured variable is set
    pub fn expansion_api_key(&self) -> Option<String> {
        std::env::var(&self.expansion.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn versions_dir(&self) -> &Path {
        &self.storage.versions_dir
    }
}
