//! Ollama backend implementation
//!
//! HTTP client for the Ollama generate API. One request per narrative; the
//! response time is captured so the engine can record generation metadata.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::prompt::PromptContext;
use super::types::{GeneratedText, NarrativeKind};
use super::AIBackend;

/// Ollama backend
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables (`OLLAMA_HOST`, `OLLAMA_MODEL`)
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn generate(
        &self,
        kind: NarrativeKind,
        context: &PromptContext,
    ) -> Result<GeneratedText> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: context.render(kind),
            stream: false,
        };

        let started = Instant::now();
        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        let duration_ms = started.elapsed().as_millis() as u64;
        debug!(
            kind = kind.as_str(),
            model = %self.model,
            duration_ms,
            "Ollama generation complete"
        );

        let text = ollama_response.response.trim().to_string();
        if text.is_empty() {
            return Err(Error::Provider("Ollama returned empty text".to_string()));
        }

        Ok(GeneratedText { text, duration_ms })
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
