//! Error types for retrieval operations
//!
//! The split that matters here is retriable vs not: [`RetrievalError::Config`]
//! is caller error (oversized query, missing credential) and fails fast,
//! while everything provider-side is treated as transient and eligible for
//! the adapter's bounded retry.

use thiserror::Error;

/// Result type for retrieval operations
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur while retrieving evidence.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Non-retriable configuration problem: oversized query or missing
    /// provider credential. Aborts immediately, never retried.
    #[error("Retrieval configuration error: {0}")]
    Config(String),

    /// Transient provider-side failure (network, rate limit, 5xx). Retried
    /// by the adapter up to its policy's attempt budget.
    #[error("Retrieval provider error: {0}")]
    Provider(String),

    /// Provider answered but the payload did not parse.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl RetrievalError {
    /// Whether the adapter's retry policy applies to this error.
    pub fn is_transient(&self) -> bool {
        !matches!(self, RetrievalError::Config(_))
    }
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        RetrievalError::Provider(err.to_string())
    }
}
