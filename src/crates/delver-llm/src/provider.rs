//! The generation provider trait
//!
//! Every model the pipeline talks to, remote or stubbed in tests, sits behind
//! [`GenerativeModel`]. The pipeline only ever sends a fully rendered prompt
//! and reads back plain text; prompt construction and response parsing live
//! with the caller.

use crate::error::Result;
use async_trait::async_trait;

/// A text-in, text-out generation backend.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Human-readable identifier for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}
