//! Mock backend for testing
//!
//! Returns predictable advice without a running provider. Useful for unit
//! tests, the `mock` backend setting, and demos.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AdviceBackend;

/// Mock advice backend
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Fixed reply; when unset a reply describing the prompt is generated
    pub reply: Option<String>,
    /// Fail every generation with a provider error
    pub failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Mock that always answers with `reply`
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::new()
        }
    }

    /// Mock whose generations always fail
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl AdviceBackend for MockBackend {
    async fn generate_advice(&self, prompt: &str) -> Result<String> {
        if self.failing {
            return Err(Error::Provider("Mock provider failure".into()));
        }
        if let Some(ref reply) = self.reply {
            return Ok(reply.clone());
        }

        let lines = prompt.lines().count();
        Ok(format!(
            "**Summary**: Mock advice for a {}-line prompt.\n\n\
             - Track every expense for a month\n\
             - Automate a transfer to savings on payday\n\n\
             *Tip*: small, consistent steps beat big one-off changes.",
            lines
        ))
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
