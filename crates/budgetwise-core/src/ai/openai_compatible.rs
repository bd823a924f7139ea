//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//! - hosted OpenAI-style APIs (with an API key)
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::AdviceBackend;

#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f64>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            temperature: None,
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl AdviceBackend for OpenAICompatibleBackend {
    async fn generate_advice(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Provider("No response from OpenAI API".into()))?;

        debug!("OpenAI-compatible response: {} chars", content.len());
        Ok(content)
    }

    async fn health_check(&self) -> bool {
        let mut req = self.http_client.get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }
        if let Ok(resp) = req.send().await {
            if resp.status().is_success() {
                return true;
            }
        }

        // Try /health (common for LocalAI, llama-server)
        if let Ok(resp) = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            if resp.status().is_success() {
                return true;
            }
        }

        false
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProviderServer;

    #[tokio::test]
    async fn test_generate_advice_with_key() {
        let server = MockProviderServer::start().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-test")
            .with_api_key("sk-test")
            .with_temperature(0.7);

        let advice = backend.generate_advice("Help me budget").await.unwrap();
        assert_eq!(advice, "OpenAI advice for: Help me budget");

        let seen = server.requests().await;
        assert_eq!(seen[0].path, "/v1/chat/completions");
        assert_eq!(seen[0].bearer.as_deref(), Some("sk-test"));
        assert_eq!(seen[0].body["model"], "gpt-test");
        assert_eq!(seen[0].body["messages"][0]["role"], "user");
        assert_eq!(seen[0].body["messages"][0]["content"], "Help me budget");
    }

    #[tokio::test]
    async fn test_without_key_sends_no_auth_header() {
        let server = MockProviderServer::start().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-test");

        backend.generate_advice("Help").await.unwrap();
        let seen = server.requests().await;
        assert!(seen[0].bearer.is_none());
        assert!(seen[0].body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_rejected_key_and_empty_choices() {
        let server = MockProviderServer::start().await;
        let bad = OpenAICompatibleBackend::new(&server.url(), "gpt-test").with_api_key("bad-key");
        let err = bad.generate_advice("Help").await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert!(!bad.health_check().await);

        let good = OpenAICompatibleBackend::new(&server.url(), "gpt-test");
        assert!(matches!(
            good.generate_advice("EMPTY").await,
            Err(Error::Provider(_))
        ));
        assert!(good.health_check().await);
    }
}
