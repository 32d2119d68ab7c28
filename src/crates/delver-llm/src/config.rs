//! Model configuration

use crate::error::{GenerationError, Result};
use std::time::Duration;

/// Environment variable holding the Cohere API key.
pub const COHERE_API_KEY_ENV: &str = "COHERE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.cohere.com";
const DEFAULT_MODEL: &str = "command-r";
const DEFAULT_TEMPERATURE: f64 = 0.3;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection and sampling settings for a remote model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// API key for the provider
    pub api_key: String,

    /// Base URL of the provider API
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature. Low by default: synthesis and critique want
    /// grounded answers, not creative ones.
    pub temperature: f64,

    /// Request timeout
    pub timeout: Duration,
}

impl ModelConfig {
    /// Build a config with the given key and the Cohere defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the API key from `COHERE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(COHERE_API_KEY_ENV)
            .map_err(|_| GenerationError::Config(format!("{COHERE_API_KEY_ENV} is not set")))?;
        if api_key.trim().is_empty() {
            return Err(GenerationError::Config(format!(
                "{COHERE_API_KEY_ENV} is empty"
            )));
        }
        Ok(Self::new(api_key))
    }

    /// Override the base URL (useful against a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
