//! Pluggable advice provider abstraction
//!
//! The advice provider is an external generative-text service: it takes the
//! compiled prompt and returns free-form advice text. Its behavior is not
//! part of this crate; only the wire protocol is.
//!
//! # Architecture
//!
//! - `AdviceBackend` trait: the single operation every provider supports
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`,
//!   `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AdvisorConfig::load(None)?;
//! if let Some(client) = AIClient::from_config(&config.provider) {
//!     let advice = client.generate_advice(&compiled.prompt).await?;
//!     println!("{}", advice);
//! }
//! ```

mod gemini;
mod mock;
mod ollama;
mod openai_compatible;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::{BackendKind, ProviderConfig};
use crate::error::Result;

/// Trait implemented by every advice provider
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AdviceBackend: Send + Sync {
    /// Send the prompt and return the advice text
    async fn generate_advice(&self, prompt: &str) -> Result<String>;

    /// Whether the provider is reachable and accepts our credentials
    async fn health_check(&self) -> bool;

    /// Model name used for generation
    fn model(&self) -> &str;

    /// Base URL of the provider
    fn host(&self) -> &str;
}

/// Concrete advice client with enum dispatch
#[derive(Clone)]
pub enum AIClient {
    Gemini(GeminiBackend),
    Ollama(OllamaBackend),
    OpenAICompatible(OpenAICompatibleBackend),
    Mock(MockBackend),
}

impl AIClient {
    /// Build the configured backend
    ///
    /// Returns `None` when the selected backend lacks what it needs to run
    /// (a Gemini API key, an OpenAI-compatible host).
    pub fn from_config(config: &ProviderConfig) -> Option<Self> {
        let http_client = http_client(config.timeout());

        let client = match config.backend {
            BackendKind::Gemini => {
                let endpoint = &config.gemini;
                let Some(api_key) = endpoint.api_key.as_deref() else {
                    warn!("Gemini backend selected but GOOGLE_API_KEY is not set");
                    return None;
                };
                let host = endpoint
                    .host
                    .as_deref()
                    .unwrap_or(GeminiBackend::DEFAULT_HOST);
                AIClient::Gemini(
                    GeminiBackend::new(host, &endpoint.model, api_key)
                        .with_http_client(http_client)
                        .with_temperature(config.temperature),
                )
            }
            BackendKind::Ollama => {
                let endpoint = &config.ollama;
                let host = endpoint.host.as_deref()?;
                AIClient::Ollama(
                    OllamaBackend::new(host, &endpoint.model)
                        .with_http_client(http_client)
                        .with_temperature(config.temperature),
                )
            }
            BackendKind::OpenAICompatible => {
                let endpoint = &config.openai_compatible;
                let Some(host) = endpoint.host.as_deref() else {
                    warn!("openai_compatible backend selected but OPENAI_COMPATIBLE_HOST is not set");
                    return None;
                };
                let mut backend = OpenAICompatibleBackend::new(host, &endpoint.model)
                    .with_http_client(http_client)
                    .with_temperature(config.temperature);
                if let Some(key) = endpoint.api_key.as_deref() {
                    backend = backend.with_api_key(key);
                }
                AIClient::OpenAICompatible(backend)
            }
            BackendKind::Mock => AIClient::Mock(MockBackend::new()),
        };

        info!(
            backend = %config.backend,
            model = client.model(),
            "Advice provider configured"
        );
        Some(client)
    }

    /// Create a Gemini backend directly
    pub fn gemini(model: &str, api_key: &str) -> Self {
        AIClient::Gemini(GeminiBackend::new(GeminiBackend::DEFAULT_HOST, model, api_key))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    ///
    /// Used for runtime model override (e.g. `advise --model`)
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Gemini(b) => AIClient::Gemini(b.with_model(model)),
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    /// Short backend name for display
    pub fn backend_name(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => BackendKind::Gemini.as_str(),
            AIClient::Ollama(_) => BackendKind::Ollama.as_str(),
            AIClient::OpenAICompatible(_) => BackendKind::OpenAICompatible.as_str(),
            AIClient::Mock(_) => BackendKind::Mock.as_str(),
        }
    }
}

// Implement AdviceBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AdviceBackend for AIClient {
    async fn generate_advice(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate_advice(prompt).await,
            AIClient::Ollama(b) => b.generate_advice(prompt).await,
            AIClient::OpenAICompatible(b) => b.generate_advice(prompt).await,
            AIClient::Mock(b) => b.generate_advice(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// HTTP client with the provider timeout applied
fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
            Client::new()
        })
}
