//! Cohere chat client
//!
//! Minimal client for the Cohere v1 chat endpoint: one prompt in, the `text`
//! field out. Anything beyond a 2xx with parseable JSON becomes a
//! [`GenerationError`] for the caller to surface.

use crate::config::ModelConfig;
use crate::error::{GenerationError, Result};
use crate::provider::GenerativeModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    text: String,
}

/// HTTP client for Cohere chat models.
#[derive(Debug)]
pub struct CohereClient {
    config: ModelConfig,
    client: reqwest::Client,
}

impl CohereClient {
    /// Build a client from the given config.
    pub fn new(config: ModelConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::Config("API key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Build a client with credentials from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ModelConfig::from_env()?)
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GenerativeModel for CohereClient {
    #[tracing::instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            message: prompt,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Provider(format!(
                "chat request failed with status {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            GenerationError::InvalidResponse(format!("malformed chat response: {e}"))
        })?;

        tracing::debug!(chars = parsed.text.len(), "generation complete");
        Ok(parsed.text)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_api_key() {
        let err = CohereClient::new(ModelConfig::new("  ")).unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));
    }

    #[test]
    fn test_chat_url_normalizes_trailing_slash() {
        let client =
            CohereClient::new(ModelConfig::new("key").with_base_url("http://host/")).unwrap();
        assert_eq!(client.chat_url(), "http://host/v1/chat");
    }

    #[test]
    fn test_name_reports_model() {
        let client =
            CohereClient::new(ModelConfig::new("key").with_model("command-r-plus")).unwrap();
        assert_eq!(client.name(), "command-r-plus");
    }
}
