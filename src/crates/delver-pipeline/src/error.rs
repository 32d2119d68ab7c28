//! Pipeline error type
//!
//! One enum wrapping the errors of every layer the pipeline composes. Node
//! executors return these boxed; the engine wraps them in
//! `GraphError::NodeExecution` with the source preserved, so callers can
//! still downcast to the concrete failure.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors surfaced by pipeline construction and execution.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Graph construction or execution failed.
    #[error(transparent)]
    Graph(#[from] delver_graph::GraphError),

    /// A generation call failed.
    #[error(transparent)]
    Generation(#[from] delver_llm::GenerationError),

    /// A retrieval call failed.
    #[error(transparent)]
    Retrieval(#[from] delver_retrieval::RetrievalError),

    /// The run state could not be serialized or deserialized.
    #[error("Invalid run state: {0}")]
    State(#[from] serde_json::Error),
}
