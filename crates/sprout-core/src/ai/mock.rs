//! Mock backend for testing
//!
//! Returns canned narrative text, or a configurable failure so the
//! degraded-generation path can be exercised without a server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::prompt::PromptContext;
use super::types::{GeneratedText, NarrativeKind};
use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// When set, every generate call fails
    pub fail_generation: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            fail_generation: false,
        }
    }

    /// Create a mock backend whose generations always fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            fail_generation: true,
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(
        &self,
        kind: NarrativeKind,
        context: &PromptContext,
    ) -> Result<GeneratedText> {
        if self.fail_generation {
            return Err(Error::Provider("mock provider failure".to_string()));
        }

        let text = format!(
            "{} had {} sleep sessions and {} feedings this {}. ({})",
            context.baby_name,
            context.sleep_session_count,
            context.feeding_count,
            context.period,
            kind.as_str()
        );

        Ok(GeneratedText {
            text,
            duration_ms: 1,
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
