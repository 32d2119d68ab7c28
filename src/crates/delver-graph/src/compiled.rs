//! Compiled graph execution
//!
//! [`CompiledGraph`] is the stateful run-graph executor. One call to
//! [`run`](CompiledGraph::run) drives one *run* (identified by a run id)
//! through the topology:
//!
//! 1. execute the current node (strictly one node at a time per run - nodes
//!    may await external I/O internally, but the engine never overlaps two
//!    nodes of the same run);
//! 2. merge the node's partial update into the run state;
//! 3. commit a checkpoint (state snapshot + node just completed) to the
//!    configured saver;
//! 4. resolve the single outgoing edge - conditional edges consult their
//!    router against the fresh state - and move on, until [`END`].
//!
//! # Iteration cap
//!
//! Cyclic topologies (critique → retry loops) must terminate. The engine
//! counts how many times each node has executed within the run; when routing
//! would push any node past `max_iterations` executions, it forces a
//! transition to [`END`] instead and reports the run as
//! [`RunOutcome::Degraded`], carrying the best state produced so far. This is
//! a controlled termination, not an error.
//!
//! # Resumption
//!
//! If the saver already holds checkpoints for the run id, `run` restores the
//! latest snapshot and re-enters at the *successor* of the last completed
//! node - completed work is never redone. Because checkpoints are committed
//! only at node boundaries, aborting a run at any suspension point leaves a
//! clean, resumable snapshot behind.

use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph, NodeId, END, START};
use delver_checkpoint::{Checkpoint, CheckpointSaver};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// How a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run reached the terminal sink through normal routing.
    Completed,

    /// The iteration cap forced termination before the routing condition was
    /// satisfied; the reported state carries the best available response.
    Degraded,
}

/// Result of one [`CompiledGraph::run`] invocation.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Final run state
    pub state: Value,

    /// Whether the run completed normally or was capped
    pub outcome: RunOutcome,

    /// Nodes executed by this invocation (resumed runs exclude prior work)
    pub steps: u64,

    /// Highest per-node execution count observed (1 for an acyclic pass;
    /// each trip around a cycle adds one)
    pub iterations: usize,
}

/// An executable, validated run graph.
///
/// Produced by [`GraphBuilder::compile`](crate::builder::GraphBuilder::compile),
/// which guarantees every node has exactly one outgoing edge - so routing
/// needs no precedence rules between unconditional and conditional edges.
#[derive(Clone)]
pub struct CompiledGraph {
    graph: Graph,
    saver: Option<Arc<dyn CheckpointSaver>>,
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("graph", &self.graph)
            .field("saver", &self.saver.is_some())
            .finish()
    }
}

impl CompiledGraph {
    pub(crate) fn new(graph: Graph) -> Self {
        Self { graph, saver: None }
    }

    /// Attach a checkpoint saver; every completed node commits a snapshot.
    pub fn with_saver(mut self, saver: Arc<dyn CheckpointSaver>) -> Self {
        self.saver = Some(saver);
        self
    }

    /// The underlying topology (for visualization and introspection).
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Execute the run to completion (or to the iteration cap).
    ///
    /// `input` must be a JSON object; it becomes the initial run state unless
    /// the saver already holds checkpoints for `run_id`, in which case the
    /// latest snapshot wins and `input` is ignored.
    ///
    /// `max_iterations` bounds how many times any single node may execute
    /// within the run.
    #[tracing::instrument(skip(self, input), fields(run_id = %run_id))]
    pub async fn run(
        &self,
        input: Value,
        run_id: &str,
        max_iterations: usize,
    ) -> Result<RunReport> {
        if !input.is_object() {
            return Err(GraphError::InvalidState(
                "run state must be a JSON object".to_string(),
            ));
        }

        let mut state = input;
        let mut visits: HashMap<NodeId, usize> = HashMap::new();
        let mut seq: u64 = 0;
        let mut steps: u64 = 0;

        // Resume from the latest checkpoint if this run already has history.
        let mut current = match self.latest_checkpoint(run_id).await? {
            Some(latest) => {
                for cp in self.checkpoint_history(run_id).await? {
                    *visits.entry(cp.node).or_insert(0) += 1;
                }
                seq = latest.seq + 1;
                state = latest.state;
                tracing::info!(
                    node = %latest.node,
                    seq = latest.seq,
                    "resuming run from latest checkpoint"
                );
                self.resolve_next(&latest.node, &state)?
            }
            None => self.resolve_next(START, &state)?,
        };

        let mut outcome = RunOutcome::Completed;

        while current != END {
            let visit = visits.get(&current).copied().unwrap_or(0) + 1;
            if visit > max_iterations {
                tracing::warn!(
                    node = %current,
                    max_iterations,
                    "iteration cap reached; forcing transition to terminal sink"
                );
                outcome = RunOutcome::Degraded;
                break;
            }
            visits.insert(current.clone(), visit);

            let spec = self.graph.nodes.get(&current).ok_or_else(|| {
                GraphError::Topology(format!("routing reached undeclared node '{current}'"))
            })?;

            tracing::debug!(node = %current, kind = ?spec.kind, visit, "executing node");
            let update = (spec.executor)(state.clone())
                .await
                .map_err(|e| GraphError::node_execution(&current, e))?;
            apply_update(&mut state, update)?;
            steps += 1;

            if let Some(saver) = &self.saver {
                saver
                    .put(Checkpoint::new(run_id, seq, current.clone(), state.clone()))
                    .await?;
                seq += 1;
            }

            current = self.resolve_next(&current, &state)?;
        }

        let iterations = visits.values().copied().max().unwrap_or(0);
        tracing::info!(?outcome, steps, iterations, "run finished");

        Ok(RunReport {
            state,
            outcome,
            steps,
            iterations,
        })
    }

    /// Resolve the single outgoing edge of `from` against the current state.
    fn resolve_next(&self, from: &str, state: &Value) -> Result<NodeId> {
        let edges = self.graph.edges.get(from).ok_or_else(|| {
            GraphError::Topology(format!("node '{from}' has no outgoing edge"))
        })?;

        // compile() guarantees exactly one outgoing edge per node
        match &edges[0] {
            Edge::Direct(to) => Ok(to.clone()),
            Edge::Conditional { router, branches } => {
                let label = router(state);
                let target = branches.get(&label).cloned().ok_or_else(|| {
                    GraphError::UnknownRoute {
                        node: from.to_string(),
                        label: label.clone(),
                    }
                })?;
                tracing::debug!(node = %from, %label, %target, "conditional route");
                Ok(target)
            }
        }
    }

    async fn latest_checkpoint(&self, run_id: &str) -> Result<Option<Checkpoint>> {
        match &self.saver {
            Some(saver) => Ok(saver.get_latest(run_id).await?),
            None => Ok(None),
        }
    }

    async fn checkpoint_history(&self, run_id: &str) -> Result<Vec<Checkpoint>> {
        match &self.saver {
            Some(saver) => Ok(saver.list(run_id).await?),
            None => Ok(Vec::new()),
        }
    }
}

/// Merge a node's partial update object over the run state.
fn apply_update(state: &mut Value, update: Value) -> Result<()> {
    let update = match update {
        Value::Object(map) => map,
        other => {
            return Err(GraphError::InvalidState(format!(
                "node update must be a JSON object, got: {other}"
            )));
        }
    };

    let target = state
        .as_object_mut()
        .ok_or_else(|| GraphError::InvalidState("run state must be a JSON object".to_string()))?;
    for (key, value) in update {
        target.insert(key, value);
    }
    Ok(())
}
