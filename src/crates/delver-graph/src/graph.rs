//! Core graph data structures
//!
//! This module defines the building blocks of a run graph: nodes, edges, and
//! the [`Graph`] container that holds them. A graph consists of:
//!
//! - **Nodes**: processing units that read the run state and return a partial
//!   state update
//! - **Edges**: transitions between nodes, either unconditional
//!   ([`Edge::Direct`]) or routed at runtime by a predicate
//!   ([`Edge::Conditional`])
//! - **Entry/terminal sentinels**: the virtual [`START`] and [`END`] nodes
//!
//! ```text
//! START ──► parse ──► search ──► answer ──► critique ──┬──► publish ──► END
//!                       ▲                              │
//!                       └────────── "retry" ◄──────────┘ (conditional)
//! ```
//!
//! `Graph` is the raw structure; use
//! [`GraphBuilder`](crate::builder::GraphBuilder) to construct one
//! ergonomically and [`compile`](crate::builder::GraphBuilder::compile) it
//! into an executable [`CompiledGraph`](crate::compiled::CompiledGraph).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Node identifier - unique name for each node in the graph
pub type NodeId = String;

/// Virtual node marking where graph execution begins.
pub const START: &str = "__start__";

/// Virtual node marking graph termination. Nodes edge to `END` to signal
/// they are terminal.
pub const END: &str = "__end__";

/// Async node executor.
///
/// Receives the full run state and returns a **partial update**: a JSON
/// object whose keys are merged over the state by the engine. Errors are
/// boxed so executors can surface domain errors (retrieval, generation)
/// without the engine knowing their concrete types.
pub type NodeExecutor = Arc<
    dyn Fn(
            Value,
        ) -> std::pin::Pin<
            Box<
                dyn std::future::Future<
                        Output = std::result::Result<
                            Value,
                            Box<dyn std::error::Error + Send + Sync>,
                        >,
                    > + Send,
            >,
        > + Send
        + Sync,
>;

/// Router function for conditional edges: inspects the state and returns a
/// branch label, which the edge's branch map translates into a target node.
pub type RouterFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Execution kind of a node.
///
/// The engine awaits every executor either way and never runs two nodes of
/// the same run concurrently; the kind records whether the node is expected
/// to suspend on external I/O, for logging and visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Pure in-process computation
    Sync,
    /// May await external I/O (retrieval or generation calls)
    AsyncCapable,
}

/// Node specification: name, execution kind, and executor function.
#[derive(Clone)]
pub struct NodeSpec {
    /// Unique node name
    pub name: String,

    /// Whether the node is expected to suspend on external I/O
    pub kind: NodeKind,

    /// The state-transforming function
    pub executor: NodeExecutor,
}

impl Debug for NodeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("executor", &"<function>")
            .finish()
    }
}

/// Edge defining a transition out of a node.
#[derive(Clone)]
pub enum Edge {
    /// Unconditional transition to a single node
    Direct(NodeId),

    /// Conditional transition: the router inspects the state and returns a
    /// label; `branches` maps labels to target nodes. The branch map is also
    /// used for compile-time validation and visualization.
    Conditional {
        /// Predicate choosing the branch label at runtime
        router: RouterFn,
        /// Label-to-target mapping
        branches: HashMap<String, NodeId>,
    },
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edge::Direct(to) => f.debug_tuple("Direct").field(to).finish(),
            Edge::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("router", &"<function>")
                .field("branches", branches)
                .finish(),
        }
    }
}

/// Raw graph structure: nodes, edges, and the entry point.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All declared nodes, by name
    pub nodes: HashMap<NodeId, NodeSpec>,

    /// Outgoing edges per source node (including [`START`])
    pub edges: HashMap<NodeId, Vec<Edge>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node.
    pub fn add_node(&mut self, spec: NodeSpec) {
        self.nodes.insert(spec.name.clone(), spec);
    }

    /// Add an unconditional edge.
    pub fn add_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) {
        self.edges
            .entry(from.into())
            .or_default()
            .push(Edge::Direct(to.into()));
    }

    /// Add a conditional edge with a router and its branch map.
    pub fn add_conditional_edge(
        &mut self,
        from: impl Into<NodeId>,
        router: RouterFn,
        branches: HashMap<String, NodeId>,
    ) {
        self.edges
            .entry(from.into())
            .or_default()
            .push(Edge::Conditional { router, branches });
    }

    /// All node names referenced by edges (sources, direct targets, and
    /// conditional branch targets), excluding the [`START`]/[`END`] sentinels.
    pub fn referenced_nodes(&self) -> Vec<&NodeId> {
        let mut referenced = Vec::new();
        for (from, edges) in &self.edges {
            if from != START {
                referenced.push(from);
            }
            for edge in edges {
                match edge {
                    Edge::Direct(to) => {
                        if to != END {
                            referenced.push(to);
                        }
                    }
                    Edge::Conditional { branches, .. } => {
                        for to in branches.values() {
                            if to != END {
                                referenced.push(to);
                            }
                        }
                    }
                }
            }
        }
        referenced
    }
}
