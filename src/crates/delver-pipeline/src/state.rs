//! Run state for a research run
//!
//! The engine works on untyped JSON so unrelated graphs can share it;
//! [`RunState`] is the typed view the pipeline's nodes read and write.
//! Every field except `query` starts empty and is filled in by the node
//! that owns it. `revised_response` holds the critic's verdict text for the
//! latest pass only; it is re-evaluated each trip around the loop and never
//! replaces `response`.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full state of one research run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunState {
    /// The original user query, set once at run start
    pub query: String,

    /// Sub-queries produced by decomposition
    pub subqueries: Vec<String>,

    /// Blank-line-joined evidence blocks from the latest retrieval pass
    pub combined_context: String,

    /// The synthesized answer
    pub response: String,

    /// Verdict text from the latest critique pass
    pub revised_response: String,
}

impl RunState {
    /// Fresh state for a new run.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Deserialize from the engine's JSON state.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Serialize into the engine's JSON state.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_starts_empty() {
        let state = RunState::new("what is rust");
        assert_eq!(state.query, "what is rust");
        assert!(state.subqueries.is_empty());
        assert!(state.response.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let state = RunState::from_value(&json!({"query": "q"})).unwrap();
        assert_eq!(state.query, "q");
        assert!(state.combined_context.is_empty());
    }

    #[test]
    fn test_round_trips_through_value() {
        let mut state = RunState::new("q");
        state.subqueries = vec!["a".to_string(), "b".to_string()];
        state.response = "answer".to_string();

        let value = state.to_value().unwrap();
        assert_eq!(RunState::from_value(&value).unwrap(), state);
    }
}
