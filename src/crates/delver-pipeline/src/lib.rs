//! # delver-pipeline
//!
//! The research pipeline: query decomposition, evidence retrieval, answer
//! synthesis, and a bounded critique/retry loop, assembled into a
//! checkpointed run graph. [`ResearchPipeline`] is the entry point; the
//! individual stages ([`QueryDecomposer`], [`AnswerSynthesizer`], [`Critic`])
//! are exported for callers that want to compose their own topology.

pub mod critic;
pub mod decompose;
pub mod error;
pub mod pipeline;
pub mod publish;
pub mod state;

// Re-export main types
pub use critic::{route, AnswerSynthesizer, Critic, Route};
pub use decompose::{QueryDecomposer, MAX_SUBQUERIES};
pub use error::{PipelineError, Result};
pub use pipeline::{mermaid_topology, PipelineConfig, ResearchPipeline};
pub use state::RunState;
