//! Error types for generation providers
//!
//! Generation failures are deliberately *not* retried by the run engine -
//! asymmetric with retrieval, where transient failures get a bounded retry.
//! Provider SDKs tend to retry internally, and a duplicated generation costs
//! tokens; a failed one surfaces to the caller instead.

use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur when calling a generation provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Missing or malformed configuration (credential, base URL).
    #[error("Generation configuration error: {0}")]
    Config(String),

    /// HTTP transport failed.
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered but the payload did not parse.
    #[error("Invalid generation response: {0}")]
    InvalidResponse(String),

    /// Provider-side failure (auth, rate limit, 5xx).
    #[error("Generation provider error: {0}")]
    Provider(String),
}
