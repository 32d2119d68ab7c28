//! # delver-llm
//!
//! Generation backends for delver: the [`GenerativeModel`] trait the pipeline
//! programs against, plus the Cohere chat client used in production. Test
//! doubles implement the same trait, so the pipeline never knows which one it
//! is holding.

pub mod cohere;
pub mod config;
pub mod error;
pub mod provider;

// Re-export main types
pub use cohere::CohereClient;
pub use config::{ModelConfig, COHERE_API_KEY_ENV};
pub use error::{GenerationError, Result};
pub use provider::GenerativeModel;
