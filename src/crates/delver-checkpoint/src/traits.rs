//! The [`CheckpointSaver`] trait - pluggable checkpoint storage
//!
//! The graph engine talks to checkpoint storage only through this trait, so a
//! durable backend (SQLite, Postgres, Redis, ...) can be substituted without
//! touching the engine. The in-memory implementation in
//! [`memory`](crate::memory) is the reference backend and the only one shipped
//! here; durability is deliberately out of scope.
//!
//! # Contract
//!
//! - `put` appends a checkpoint to its run's sequence. The engine assigns
//!   strictly increasing `seq` values per run; savers may reject regressions
//!   but are not required to.
//! - `get_latest` returns the newest checkpoint for a run, or `None` for a
//!   run that has never checkpointed.
//! - `list` returns a run's full sequence in commit order.
//! - Distinct runs must not interfere. Concurrent writers to the *same* run
//!   are not supported (the engine is single-writer per run).

use crate::checkpoint::Checkpoint;
use crate::error::{CheckpointError, Result};
use async_trait::async_trait;

/// Storage interface for run checkpoints.
#[async_trait]
pub trait CheckpointSaver: Send + Sync {
    /// Append a checkpoint to its run's sequence.
    async fn put(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Fetch the latest checkpoint for a run, if any exists.
    async fn get_latest(&self, run_id: &str) -> Result<Option<Checkpoint>>;

    /// Fetch a run's full checkpoint sequence in commit order.
    async fn list(&self, run_id: &str) -> Result<Vec<Checkpoint>>;

    /// Fetch the latest checkpoint for a run, failing if the run is unknown.
    async fn require_latest(&self, run_id: &str) -> Result<Checkpoint> {
        self.get_latest(run_id)
            .await?
            .ok_or_else(|| CheckpointError::NotFound(run_id.to_string()))
    }
}
