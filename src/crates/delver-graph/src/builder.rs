//! Graph builder - ergonomic construction and compile-time validation
//!
//! [`GraphBuilder`] wraps the raw [`Graph`](crate::graph::Graph) with a
//! closure-friendly API and performs structural validation when
//! [`compile`](GraphBuilder::compile)d into an executable
//! [`CompiledGraph`](crate::compiled::CompiledGraph).
//!
//! # Compile-time guarantees
//!
//! `compile()` rejects, with [`GraphError::Topology`]:
//!
//! - edges referencing undeclared nodes (sources, targets, branch targets);
//! - a declared node with no outgoing edge that is not the terminal sink;
//! - a missing or duplicated entry edge out of [`START`].
//!
//! and, with [`GraphError::AmbiguousRouting`]:
//!
//! - a node carrying both an unconditional and a conditional outgoing edge
//!   (or any second outgoing edge). The engine never guesses which edge
//!   fires; such topologies are a configuration hazard and fail fast.
//!
//! A compiled graph therefore has exactly one outgoing edge per node, which
//! is what lets the executor resolve routing without precedence rules.
//!
//! # Example
//!
//! ```rust
//! use delver_graph::builder::GraphBuilder;
//! use delver_graph::graph::{NodeKind, START, END};
//! use serde_json::json;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_node("work", NodeKind::Sync, |_state| {
//!     Box::pin(async move { Ok(json!({"done": true})) })
//! });
//! builder.add_edge(START, "work");
//! builder.add_conditional_edge(
//!     "work",
//!     Arc::new(|state| {
//!         if state["done"].as_bool().unwrap_or(false) { "finish" } else { "again" }.to_string()
//!     }),
//!     HashMap::from([
//!         ("finish".to_string(), END.to_string()),
//!         ("again".to_string(), "work".to_string()),
//!     ]),
//! );
//!
//! let compiled = builder.compile().unwrap();
//! ```

use crate::compiled::CompiledGraph;
use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph, NodeExecutor, NodeId, NodeKind, NodeSpec, RouterFn, END, START};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for run graphs.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node with its execution kind and executor closure.
    ///
    /// The executor receives the full state and returns a partial update
    /// object that the engine merges over the state.
    pub fn add_node<F>(&mut self, name: impl Into<NodeId>, kind: NodeKind, executor: F) -> &mut Self
    where
        F: Fn(
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
            + Sync
            + 'static,
    {
        let name = name.into();
        let executor: NodeExecutor = Arc::new(executor);
        self.graph.add_node(NodeSpec {
            name,
            kind,
            executor,
        });
        self
    }

    /// Add an unconditional edge.
    pub fn add_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> &mut Self {
        self.graph.add_edge(from, to);
        self
    }

    /// Add a conditional edge: `router` inspects the state and returns a
    /// label, `branches` maps labels to target nodes.
    pub fn add_conditional_edge(
        &mut self,
        from: impl Into<NodeId>,
        router: RouterFn,
        branches: HashMap<String, NodeId>,
    ) -> &mut Self {
        self.graph.add_conditional_edge(from, router, branches);
        self
    }

    /// Validate the topology and produce an executable graph.
    pub fn compile(self) -> Result<CompiledGraph> {
        let graph = self.graph;

        // Every referenced node must be declared.
        for name in graph.referenced_nodes() {
            if !graph.nodes.contains_key(name) {
                return Err(GraphError::Topology(format!(
                    "node '{name}' is referenced by an edge but was never declared"
                )));
            }
        }

        // Exactly one entry edge out of START.
        match graph.edges.get(START).map(Vec::as_slice) {
            Some([Edge::Direct(_)]) => {}
            Some([Edge::Conditional { .. }]) => {
                return Err(GraphError::Topology(
                    "entry edge out of START must be unconditional".to_string(),
                ));
            }
            Some(_) => {
                return Err(GraphError::AmbiguousRouting {
                    node: START.to_string(),
                    detail: "multiple entry edges".to_string(),
                });
            }
            None => {
                return Err(GraphError::Topology(
                    "no entry edge out of START".to_string(),
                ));
            }
        }

        // Every declared node needs a way forward, and only one.
        for name in graph.nodes.keys() {
            let edges = graph.edges.get(name).map(Vec::as_slice).unwrap_or(&[]);
            match edges {
                [] => {
                    return Err(GraphError::Topology(format!(
                        "node '{name}' has no outgoing edge and is not the terminal sink"
                    )));
                }
                [_] => {}
                many => {
                    let direct = many.iter().filter(|e| matches!(e, Edge::Direct(_))).count();
                    let conditional = many.len() - direct;
                    return Err(GraphError::AmbiguousRouting {
                        node: name.clone(),
                        detail: format!(
                            "{direct} unconditional and {conditional} conditional outgoing edges; \
                             a node may carry exactly one"
                        ),
                    });
                }
            }
        }

        Ok(CompiledGraph::new(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop() -> impl Fn(
        Value,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<
                    Output = std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>>,
                > + Send,
        >,
    > {
        |_state| Box::pin(async move { Ok(json!({})) })
    }

    #[test]
    fn test_compile_linear_graph() {
        let mut builder = GraphBuilder::new();
        builder.add_node("a", NodeKind::Sync, noop());
        builder.add_node("b", NodeKind::Sync, noop());
        builder.add_edge(START, "a");
        builder.add_edge("a", "b");
        builder.add_edge("b", END);

        assert!(builder.compile().is_ok());
    }

    #[test]
    fn test_compile_rejects_undeclared_node() {
        let mut builder = GraphBuilder::new();
        builder.add_node("a", NodeKind::Sync, noop());
        builder.add_edge(START, "a");
        builder.add_edge("a", "ghost");

        let err = builder.compile().unwrap_err();
        assert!(matches!(err, GraphError::Topology(_)), "got {err:?}");
    }

    #[test]
    fn test_compile_rejects_dangling_node() {
        let mut builder = GraphBuilder::new();
        builder.add_node("a", NodeKind::Sync, noop());
        builder.add_edge(START, "a");
        // "a" has no way forward

        let err = builder.compile().unwrap_err();
        assert!(matches!(err, GraphError::Topology(_)), "got {err:?}");
    }

    #[test]
    fn test_compile_rejects_direct_plus_conditional() {
        let mut builder = GraphBuilder::new();
        builder.add_node("a", NodeKind::Sync, noop());
        builder.add_edge(START, "a");
        builder.add_edge("a", END);
        builder.add_conditional_edge(
            "a",
            Arc::new(|_| "done".to_string()),
            HashMap::from([("done".to_string(), END.to_string())]),
        );

        let err = builder.compile().unwrap_err();
        assert!(
            matches!(err, GraphError::AmbiguousRouting { ref node, .. } if node == "a"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_compile_rejects_missing_entry() {
        let mut builder = GraphBuilder::new();
        builder.add_node("a", NodeKind::Sync, noop());
        builder.add_edge("a", END);

        let err = builder.compile().unwrap_err();
        assert!(matches!(err, GraphError::Topology(_)), "got {err:?}");
    }

    #[test]
    fn test_compile_rejects_unmapped_branch_target() {
        let mut builder = GraphBuilder::new();
        builder.add_node("a", NodeKind::Sync, noop());
        builder.add_edge(START, "a");
        builder.add_conditional_edge(
            "a",
            Arc::new(|_| "x".to_string()),
            HashMap::from([("x".to_string(), "ghost".to_string())]),
        );

        let err = builder.compile().unwrap_err();
        assert!(matches!(err, GraphError::Topology(_)), "got {err:?}");
    }
}
