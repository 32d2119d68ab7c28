//! Tavily search API client
//!
//! Thin reqwest implementation of [`SearchProvider`] against the Tavily REST
//! API. Requests ask for up to 10 results with the provider's own answer
//! included; raw page content is skipped to keep payloads small. The
//! credential comes from [`TavilyConfig`], typically via the
//! `TAVILY_API_KEY` environment variable - a missing credential is a
//! [`RetrievalError::Config`] and fails before any network traffic.

use crate::error::{RetrievalError, Result};
use crate::provider::{SearchDepth, SearchProvider, SearchResponse, SearchResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
const DEFAULT_MAX_RESULTS: usize = 10;

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Configuration for the Tavily client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilyConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API
    pub base_url: String,

    /// Request timeout duration
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Maximum number of raw results to request per query
    pub max_results: usize,
}

impl TavilyConfig {
    /// Create a configuration with the given API key and defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: default_timeout(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Read the API key from `TAVILY_API_KEY`.
    ///
    /// # Errors
    ///
    /// `RetrievalError::Config` if the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var("TAVILY_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(RetrievalError::Config(
                "Tavily API key not found (set TAVILY_API_KEY)".to_string(),
            )),
        }
    }

    /// Override the base URL (useful for testing against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Tavily REST client.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    config: TavilyConfig,
    client: Client,
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
    max_results: usize,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

impl TavilyClient {
    /// Create a client from the given configuration.
    pub fn new(config: TavilyConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RetrievalError::Config(
                "Tavily API key not found".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RetrievalError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Create a client with the credential taken from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(TavilyConfig::from_env()?)
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<SearchResponse> {
        let url = format!("{}/search", self.config.base_url);
        let body = TavilyRequest {
            api_key: &self.config.api_key,
            query,
            search_depth: depth.as_str(),
            include_answer: true,
            include_raw_content: false,
            max_results: self.config.max_results,
        };

        tracing::debug!(%depth, query_len = query.len(), "tavily search");
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Provider(format!(
                "tavily returned {status}: {detail}"
            )));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        Ok(SearchResponse {
            results: parsed
                .results
                .into_iter()
                .map(|r| SearchResult {
                    title: r.title,
                    content: r.content,
                    score: r.score,
                })
                .collect(),
        })
    }
}
