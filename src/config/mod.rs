//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Match-data API (GRID) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Central Data endpoint (series listings, team metadata)
    #[serde(default = "default_central_data_url")]
    pub central_data_url: String,

    /// Series State endpoint (per-game statistics)
    #[serde(default = "default_series_state_url")]
    pub series_state_url: String,

    /// Auth header style: "x-api-key" or "bearer"
    #[serde(default = "default_auth_method")]
    pub auth_method: String,

    /// Serve canned records instead of calling the remote API
    #[serde(default)]
    pub use_mock: bool,

    /// Max in-flight series detail fetches
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_grid_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_key_env() -> String {
    "GRID_API_KEY".to_string()
}

fn default_central_data_url() -> String {
    "https://api-op.grid.gg/central-data/graphql".to_string()
}

fn default_series_state_url() -> String {
    "https://api-op.grid.gg/live-data-feed/series-state/graphql".to_string()
}

fn default_auth_method() -> String {
    "x-api-key".to_string()
}

fn default_detail_concurrency() -> usize {
    3
}

fn default_grid_timeout() -> u64 {
    30
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            central_data_url: default_central_data_url(),
            series_state_url: default_series_state_url(),
            auth_method: default_auth_method(),
            use_mock: false,
            detail_concurrency: default_detail_concurrency(),
            timeout_seconds: default_grid_timeout(),
        }
    }
}

/// Text-generation backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Backend type: "ollama" or "disabled"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Base URL for the AI service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u64,

    /// Max tokens per generation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_backend() -> String {
    "ollama".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_ai_timeout() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_ai_timeout(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            grid: GridConfig::default(),
            ai: AiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.detail_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "Detail fetch concurrency must be greater than 0".to_string(),
            ));
        }

        if self.grid.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Grid timeout must be greater than 0".to_string(),
            ));
        }

        if self.ai.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "AI timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        match self.grid.auth_method.as_str() {
            "x-api-key" | "bearer" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Unknown auth method: {}",
                    other
                )))
            }
        }

        Ok(())
    }
}
