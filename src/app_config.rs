use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::ProviderError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default source language code (ISO 639-1)
    pub source_language: String,

    /// Default target language code (ISO 639-1)
    pub target_language: String,

    /// Completion provider config
    pub provider: ProviderConfig,

    /// Record store config
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Admin server config
    #[serde(default)]
    pub server: ServerConfig,

    /// Batch pacing config
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Completion provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key; falls back to GOOGLE_API_KEY when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL; empty means the public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Per-request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key from the config or the GOOGLE_API_KEY environment
    /// variable. Absence is a batch-fatal precondition failure.
    pub fn resolve_api_key(&self) -> Result<String, ProviderError> {
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.trim().to_string());
        }

        match std::env::var("GOOGLE_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ProviderError::MissingApiKey(
                "set provider.api_key in the config file or the GOOGLE_API_KEY environment variable"
                    .to_string(),
            )),
        }
    }
}

/// Record store configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    // @field: Database file path; empty means the per-user default location
    #[serde(default = "String::new")]
    pub path: String,
}

/// Admin server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    // @field: Bind address for the admin HTTP server
    #[serde(default = "default_bind_addr")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_addr(),
        }
    }
}

/// Batch pacing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    // @field: Delay between consecutive provider calls within a batch
    #[serde(default = "default_inter_item_delay_ms")]
    pub inter_item_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inter_item_delay_ms: default_inter_item_delay_ms(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_inter_item_delay_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "vi".to_string(),
            target_language: "zh".to_string(),
            provider: ProviderConfig::default(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            batch: BatchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration file, or create a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Save the configuration to a file as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        if self.source_language.trim().eq_ignore_ascii_case(self.target_language.trim()) {
            return Err(anyhow!(
                "Source and target language must differ: {}",
                self.source_language
            ));
        }

        if self.provider.model.trim().is_empty() {
            return Err(anyhow!("Provider model must not be empty"));
        }

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout must be greater than zero"));
        }

        if !self.provider.endpoint.trim().is_empty() {
            url::Url::parse(self.provider.endpoint.trim())
                .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;
        }

        Ok(())
    }
}
