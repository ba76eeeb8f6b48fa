//! Runtime configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! `.env` plus the process environment, then command-line flags (applied by
//! the caller).

use crate::llm::BackendConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "promptcraft.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    /// Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub catalog_path: PathBuf,
    pub diagnostics_path: Option<PathBuf>,
    pub default_tool: String,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            request_timeout_secs: 30,
            catalog_path: PathBuf::from("prompts.csv"),
            diagnostics_path: None,
            default_tool: "Midjourney".to_string(),
            debug: false,
        }
    }
}

impl Settings {
    /// Loads `.env`, then `config_path` (or `promptcraft.toml` when present),
    /// then environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self, SettingsError> {
        dotenv::dotenv().ok();

        let default_file = Path::new(DEFAULT_CONFIG_FILE);
        let mut settings = match config_path {
            Some(path) => Self::from_file(path)?,
            None if default_file.exists() => Self::from_file(default_file)?,
            None => Self::default(),
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides fields from variables found by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = lookup("API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("TEMPERATURE") {
            self.temperature = v.trim().parse().map_err(|_| SettingsError::InvalidValue {
                key: "TEMPERATURE",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs =
                v.trim().parse().map_err(|_| SettingsError::InvalidValue {
                    key: "REQUEST_TIMEOUT_SECS",
                    value: v.clone(),
                })?;
        }
        if let Some(v) = lookup("CATALOG_PATH") {
            self.catalog_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DIAGNOSTICS_PATH") {
            self.diagnostics_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("PROMPTCRAFT_DEBUG") {
            self.debug = parse_flag(&v).ok_or(SettingsError::InvalidValue {
                key: "PROMPTCRAFT_DEBUG",
                value: v.clone(),
            })?;
        }
        Ok(())
    }

    /// Required variables that are absent. Enhancement falls back while any are missing.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            missing.push("API_KEY");
        }
        if self.api_url.trim().is_empty() {
            missing.push("API_URL");
        }
        if self.model.trim().is_empty() {
            missing.push("MODEL");
        }
        missing
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            timeout: self.timeout(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
