//! In-memory checkpoint saver
//!
//! Reference [`CheckpointSaver`] implementation backed by a process-lifetime
//! map from run id to checkpoint sequence. Suitable for local runs and tests;
//! implement the trait against a real store for anything that must survive a
//! restart.

use crate::checkpoint::Checkpoint;
use crate::error::{CheckpointError, Result};
use crate::traits::CheckpointSaver;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory checkpoint storage, keyed by run id.
type CheckpointStorage = Arc<RwLock<HashMap<String, Vec<Checkpoint>>>>;

/// In-memory checkpoint saver.
///
/// Checkpoints are appended per run; the latest entry is always the last in
/// the run's vector. The `RwLock` serializes writes across runs, which is
/// sufficient because the engine is single-writer per run.
///
/// # Example
///
/// ```rust
/// use delver_checkpoint::{Checkpoint, CheckpointSaver, InMemorySaver};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let saver = InMemorySaver::new();
/// saver.put(Checkpoint::new("run-1", 0, "parse", json!({}))).await?;
///
/// let latest = saver.get_latest("run-1").await?.unwrap();
/// assert_eq!(latest.node, "parse");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySaver {
    storage: CheckpointStorage,
}

impl InMemorySaver {
    /// Create an empty in-memory saver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of runs currently tracked.
    pub async fn run_count(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Total number of checkpoints across all runs.
    pub async fn checkpoint_count(&self) -> usize {
        self.storage.read().await.values().map(Vec::len).sum()
    }

    /// Drop all checkpoints (useful for testing).
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }
}

#[async_trait]
impl CheckpointSaver for InMemorySaver {
    async fn put(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut storage = self.storage.write().await;
        let entries = storage.entry(checkpoint.run_id.clone()).or_default();

        if let Some(last) = entries.last() {
            if checkpoint.seq <= last.seq {
                return Err(CheckpointError::Invalid(format!(
                    "non-monotonic seq {} for run {} (latest is {})",
                    checkpoint.seq, checkpoint.run_id, last.seq
                )));
            }
        }

        entries.push(checkpoint);
        Ok(())
    }

    async fn get_latest(&self, run_id: &str) -> Result<Option<Checkpoint>> {
        let storage = self.storage.read().await;
        Ok(storage.get(run_id).and_then(|entries| entries.last().cloned()))
    }

    async fn list(&self, run_id: &str) -> Result<Vec<Checkpoint>> {
        let storage = self.storage.read().await;
        Ok(storage.get(run_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_and_get_latest() {
        let saver = InMemorySaver::new();

        saver
            .put(Checkpoint::new("run-1", 0, "parse", json!({"step": 0})))
            .await
            .unwrap();
        saver
            .put(Checkpoint::new("run-1", 1, "search", json!({"step": 1})))
            .await
            .unwrap();

        let latest = saver.get_latest("run-1").await.unwrap().unwrap();
        assert_eq!(latest.seq, 1);
        assert_eq!(latest.node, "search");
        assert_eq!(latest.state["step"], 1);
    }

    #[tokio::test]
    async fn test_unknown_run_is_none() {
        let saver = InMemorySaver::new();
        assert!(saver.get_latest("missing").await.unwrap().is_none());
        assert!(saver.list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_require_latest_not_found() {
        let saver = InMemorySaver::new();
        let err = saver.require_latest("missing").await.unwrap_err();
        assert!(matches!(err, CheckpointError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_runs_are_independent() {
        let saver = InMemorySaver::new();

        saver
            .put(Checkpoint::new("run-a", 0, "parse", json!({"run": "a"})))
            .await
            .unwrap();
        saver
            .put(Checkpoint::new("run-b", 0, "parse", json!({"run": "b"})))
            .await
            .unwrap();

        assert_eq!(saver.run_count().await, 2);
        let a = saver.get_latest("run-a").await.unwrap().unwrap();
        let b = saver.get_latest("run-b").await.unwrap().unwrap();
        assert_eq!(a.state["run"], "a");
        assert_eq!(b.state["run"], "b");
    }

    #[tokio::test]
    async fn test_rejects_non_monotonic_seq() {
        let saver = InMemorySaver::new();

        saver
            .put(Checkpoint::new("run-1", 1, "search", json!({})))
            .await
            .unwrap();
        let err = saver
            .put(Checkpoint::new("run-1", 1, "search", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckpointError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_list_preserves_commit_order() {
        let saver = InMemorySaver::new();
        for (seq, node) in [(0, "parse"), (1, "search"), (2, "answer")] {
            saver
                .put(Checkpoint::new("run-1", seq, node, json!({})))
                .await
                .unwrap();
        }

        let nodes: Vec<String> = saver
            .list("run-1")
            .await
            .unwrap()
            .into_iter()
            .map(|cp| cp.node)
            .collect();
        assert_eq!(nodes, vec!["parse", "search", "answer"]);
    }
}
