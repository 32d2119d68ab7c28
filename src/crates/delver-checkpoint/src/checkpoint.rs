//! Checkpoint data structures for run-state persistence
//!
//! A [`Checkpoint`] is a complete snapshot of one run's state, committed by the
//! graph engine after a node finishes. Checkpoints form an append-only sequence
//! per run id; only the latest entry is needed to resume a run, but the full
//! sequence is retained for inspection and testing.
//!
//! ```text
//! run "7f3a..."                      run "c901..."
//! ┌────────────────────────┐         ┌────────────────────────┐
//! │ seq 0  after "parse"   │         │ seq 0  after "parse"   │
//! │ seq 1  after "search"  │         │ seq 1  after "search"  │
//! │ seq 2  after "answer"  │◄─latest │ ...                    │
//! └────────────────────────┘         └────────────────────────┘
//! ```
//!
//! Because checkpoints are committed only after a node fully completes, an
//! aborted run always resumes from a node boundary; partial-node state is
//! never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A point-in-time snapshot of run state, taken after a node completed.
///
/// # Examples
///
/// ```rust
/// use delver_checkpoint::Checkpoint;
/// use serde_json::json;
///
/// let cp = Checkpoint::new("run-1", 0, "parse", json!({"query": "what is rust?"}));
/// assert_eq!(cp.run_id, "run-1");
/// assert_eq!(cp.node, "parse");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique identifier for this checkpoint
    pub id: String,

    /// Run this checkpoint belongs to
    pub run_id: String,

    /// Position in the run's checkpoint sequence (0-based, strictly increasing)
    pub seq: u64,

    /// Name of the node that had just completed when this snapshot was taken
    pub node: String,

    /// Full state snapshot at the node boundary
    pub state: Value,

    /// When the checkpoint was committed
    pub ts: DateTime<Utc>,
}

impl Checkpoint {
    /// Create a checkpoint for the given run position.
    pub fn new(
        run_id: impl Into<String>,
        seq: u64,
        node: impl Into<String>,
        state: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            run_id: run_id.into(),
            seq,
            node: node.into(),
            state,
            ts: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkpoint_new() {
        let cp = Checkpoint::new("run-1", 3, "critique", json!({"response": "hi"}));
        assert_eq!(cp.run_id, "run-1");
        assert_eq!(cp.seq, 3);
        assert_eq!(cp.node, "critique");
        assert_eq!(cp.state["response"], "hi");
        assert!(!cp.id.is_empty());
    }

    #[test]
    fn test_checkpoint_serialization_round_trip() {
        let cp = Checkpoint::new("run-1", 0, "parse", json!({"query": "q"}));
        let encoded = serde_json::to_string(&cp).unwrap();
        let decoded: Checkpoint = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, cp.id);
        assert_eq!(decoded.seq, cp.seq);
        assert_eq!(decoded.state, cp.state);
    }
}
