//! Pluggable AI provider abstraction
//!
//! Backend-agnostic interface for narrative generation. Backends run locally
//! (Ollama) or in tests (mock); swapping providers never touches the engine.
//!
//! # Architecture
//!
//! - `AIBackend` trait: the provider-gateway interface
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - `narrative`: try-AI-then-fallback orchestration on top of a backend
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod mock;
pub mod narrative;
mod ollama;
pub mod prompt;
mod types;

pub use mock::MockBackend;
pub use narrative::{narrate, NarrativeOutcome};
pub use ollama::OllamaBackend;
pub use prompt::PromptContext;
pub use types::{GeneratedText, NarrativeKind, NarrativeResult};

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for AI provider backends
///
/// Timeouts, retries, and cancellation are the provider's own concern; the
/// engine only distinguishes success from failure.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate narrative text for the given kind and context
    async fn generate(&self, kind: NarrativeKind, context: &PromptContext)
        -> Result<GeneratedText>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for metadata)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(AIClient::Ollama),
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(AIClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a mock backend whose generations always fail
    pub fn failing_mock() -> Self {
        AIClient::Mock(MockBackend::failing())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate(
        &self,
        kind: NarrativeKind,
        context: &PromptContext,
    ) -> Result<GeneratedText> {
        match self {
            AIClient::Ollama(b) => b.generate(kind, context).await,
            AIClient::Mock(b) => b.generate(kind, context).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
