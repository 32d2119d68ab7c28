//! # delver-graph
//!
//! The run-graph execution engine behind delver: a small state machine with
//! nodes, unconditional and conditional edges, per-node checkpointing, and a
//! bounded feedback cycle.
//!
//! # Architecture
//!
//! ```text
//! GraphBuilder ──compile()──► CompiledGraph ──run()──► RunReport
//!      │                           │
//!      │ topology checks:          │ per node: execute → merge update
//!      │  - undeclared nodes       │           → checkpoint → route
//!      │  - dangling nodes         │
//!      │  - ambiguous routing      └──► CheckpointSaver (delver-checkpoint)
//! ```
//!
//! State is a JSON object threaded through the nodes; each node returns a
//! partial update that the engine merges. Cycles are legal and bounded by a
//! per-run iteration cap that degrades instead of looping forever.
//!
//! # Quick start
//!
//! ```rust
//! use delver_graph::{GraphBuilder, NodeKind, START, END};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = GraphBuilder::new();
//! builder.add_node("greet", NodeKind::Sync, |_state| {
//!     Box::pin(async move { Ok(json!({"greeting": "hello"})) })
//! });
//! builder.add_edge(START, "greet");
//! builder.add_edge("greet", END);
//!
//! let compiled = builder.compile()?;
//! let report = compiled.run(json!({}), "run-1", 10).await?;
//! assert_eq!(report.state["greeting"], "hello");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod compiled;
pub mod error;
pub mod graph;
pub mod retry;
pub mod visualization;

// Re-export main types
pub use builder::GraphBuilder;
pub use compiled::{CompiledGraph, RunOutcome, RunReport};
pub use error::{GraphError, Result};
pub use graph::{Edge, Graph, NodeExecutor, NodeId, NodeKind, NodeSpec, RouterFn, END, START};
pub use retry::RetryPolicy;
pub use visualization::to_mermaid;
