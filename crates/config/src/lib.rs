//! Configuration loading, validation, and management for CareBridge.
//!
//! Loads configuration from `~/.carebridge/config.toml` (or the path in
//! `CAREBRIDGE_CONFIG`) with environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.carebridge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// HTTP server configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Persona catalog configuration
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Summary extraction configuration
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "phi3:mini".into()
}
fn default_temperature() -> f32 {
    0.7
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("gateway", &self.gateway)
            .field("persona", &self.persona)
            .field("summary", &self.summary)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("structured_output", &self.structured_output)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed to call the API from a browser. `["*"]` allows any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Upper bound on one LLM round-trip before the request fails
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    8001
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_request_timeout() -> u64 {
    120
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Language substituted when a request names an unknown one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Replacement catalog definition (TOML). Built-in catalog when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
}

fn default_language() -> String {
    "en".into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            catalog_path: None,
        }
    }
}

/// How model output is turned into a structured summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStrategy {
    /// Schema-constrained JSON when the provider supports it, tagged text otherwise
    #[default]
    Auto,
    /// Free text with `[SYMPTOMS]` / `[RECOMMENDATIONS]` section markers
    Tagged,
    /// JSON output constrained by a schema
    Schema,
}

impl SummaryStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStrategy::Auto => "auto",
            SummaryStrategy::Tagged => "tagged",
            SummaryStrategy::Schema => "schema",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default)]
    pub strategy: SummaryStrategy,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Whether the endpoint honors JSON-schema constrained output.
    /// Unset uses the provider's own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<bool>,
}

impl AppConfig {
    /// Load configuration from `CAREBRIDGE_CONFIG` or the default path
    /// (~/.carebridge/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `CAREBRIDGE_API_KEY`
    /// - `CAREBRIDGE_PROVIDER`
    /// - `CAREBRIDGE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CAREBRIDGE_API_KEY").ok();
        }

        if let Ok(provider) = std::env::var("CAREBRIDGE_PROVIDER") {
            config.default_provider = provider;
        }

        if let Ok(model) = std::env::var("CAREBRIDGE_MODEL") {
            config.default_model = model;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// The config file in effect: `CAREBRIDGE_CONFIG` or the default location.
    pub fn config_path() -> PathBuf {
        std::env::var("CAREBRIDGE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"))
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".carebridge")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.default_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_model must not be empty".into(),
            ));
        }

        if self.gateway.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.request_timeout_secs must be > 0".into(),
            ));
        }

        if self.persona.default_language.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "persona.default_language must not be empty".into(),
            ));
        }

        for origin in &self.gateway.allowed_origins {
            let ok = origin == "*"
                || origin.starts_with("http://")
                || origin.starts_with("https://");
            if !ok {
                return Err(ConfigError::ValidationError(format!(
                    "gateway.allowed_origins entry '{origin}' must be \"*\" or an http(s) origin"
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            gateway: GatewayConfig::default(),
            persona: PersonaConfig::default(),
            summary: SummaryConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
