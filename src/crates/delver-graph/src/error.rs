//! Error types for graph construction and execution
//!
//! The taxonomy separates configuration-time failures (bad topology,
//! ambiguous routing - caught at [`compile`](crate::builder::GraphBuilder::compile)
//! time and never at runtime) from execution-time failures (a node executor
//! returning an error, a router producing an unmapped label, checkpoint
//! storage problems).
//!
//! Reaching the iteration cap is deliberately *not* an error: it is a
//! controlled termination reported as
//! [`RunOutcome::Degraded`](crate::compiled::RunOutcome::Degraded).

use delver_checkpoint::CheckpointError;
use thiserror::Error;

/// Convenience result type using [`GraphError`]
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building, compiling, or running a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Graph structure is malformed: an edge references an undeclared node,
    /// or a declared node has no outgoing edge and is not the terminal sink.
    ///
    /// Raised at compile time; a compiled graph never hits this.
    #[error("Invalid topology: {0}")]
    Topology(String),

    /// A node carries both an unconditional and a conditional outgoing edge
    /// (or more than one outgoing edge in total).
    ///
    /// The engine refuses to guess precedence between the two, so such
    /// topologies are rejected at compile time rather than silently routed.
    #[error("Ambiguous routing from node '{node}': {detail}")]
    AmbiguousRouting {
        /// Node with conflicting outgoing edges
        node: String,
        /// What exactly conflicts
        detail: String,
    },

    /// A conditional router returned a label with no branch mapping.
    #[error("Router at node '{node}' returned unmapped label '{label}'")]
    UnknownRoute {
        /// Node whose router misbehaved
        node: String,
        /// The label that had no target
        label: String,
    },

    /// A node executor failed. The original error is preserved as the source
    /// so callers can inspect provider-specific failures (e.g. a non-retriable
    /// configuration error from the retrieval adapter) without substitution.
    #[error("Node '{node}' execution failed: {source}")]
    NodeExecution {
        /// Name of the node that failed
        node: String,
        /// The underlying error, unchanged
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Run state was not a JSON object, or a node returned a non-object update.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Checkpoint storage failed.
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

impl GraphError {
    /// Wrap a node executor failure, preserving the original error.
    pub fn node_execution(
        node: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::NodeExecution {
            node: node.into(),
            source,
        }
    }
}
