//! Text-generation backend abstraction.
//!
//! The synthesizer only needs prompt-in, text-out. Everything
//! backend-specific (request shapes, endpoints, auth) stays behind
//! [`TextBackend`] so the fallback path can be tested without a model
//! running.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::AiConfig;

/// Errors from strategy synthesis.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to parse response: {0}")]
    ResponseParse(String),
}

/// Trait for text-generation backends.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Generate a completion for the prompt.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, SynthError>;
}

/// Local Ollama backend.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens_cap: u32,
}

impl OllamaBackend {
    pub fn new(config: &AiConfig) -> Result<Self, SynthError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SynthError::BackendUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens_cap: config.max_tokens,
        })
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl TextBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, SynthError> {
        let url = format!("{}/api/chat", self.base_url);

        let request = OllamaRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                num_predict: max_tokens.min(self.max_tokens_cap),
            },
        };

        debug!("Sending request to Ollama: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SynthError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthError::BackendUnavailable(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| SynthError::ResponseParse(e.to_string()))?;

        Ok(parsed.message.content)
    }
}

/// Backend that always fails, forcing the deterministic fallback path.
pub struct DisabledBackend;

#[async_trait]
impl TextBackend for DisabledBackend {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _system_prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, SynthError> {
        Err(SynthError::BackendUnavailable(
            "text generation disabled by configuration".to_string(),
        ))
    }
}

/// Create a backend from configuration. Unknown names fall back to
/// disabled rather than failing startup.
pub fn backend_from_config(config: &AiConfig) -> Result<Box<dyn TextBackend>, SynthError> {
    match config.backend.as_str() {
        "ollama" => Ok(Box::new(OllamaBackend::new(config)?)),
        _ => Ok(Box::new(DisabledBackend)),
    }
}

/// Mock backend for testing.
#[cfg(test)]
pub struct MockBackend {
    response: Result<String, String>,
}

#[cfg(test)]
impl MockBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TextBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _system_prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, SynthError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(SynthError::BackendUnavailable(message.clone())),
        }
    }
}
