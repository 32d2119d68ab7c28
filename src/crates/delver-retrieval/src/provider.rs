//! The [`SearchProvider`] trait and wire types
//!
//! The engine consumes retrieval through this narrow interface: one query in,
//! a scored result list out. Anything provider-side that fails surfaces as
//! [`RetrievalError::Provider`](crate::error::RetrievalError::Provider) so the
//! adapter's retry policy can treat it uniformly.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Retrieval depth requested from the provider.
///
/// `Advanced` is slower and costlier but returns better-grounded results;
/// the adapter selects it adaptively (see
/// [`RetrievalAdapter`](crate::adapter::RetrievalAdapter)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    /// Fast, shallow retrieval
    Basic,
    /// Deeper retrieval for long or numerous sub-queries
    Advanced,
}

impl SearchDepth {
    /// Wire representation expected by providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored retrieval hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Source title
    pub title: String,

    /// Extracted content snippet
    pub content: String,

    /// Provider relevance score (higher is better)
    #[serde(default)]
    pub score: f64,
}

/// Full provider response for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Scored hits, in provider order
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// An external knowledge-retrieval provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Retrieve scored results for one query at the requested depth.
    ///
    /// Queries longer than 400 characters are rejected upstream by the
    /// adapter; implementations may assume the limit holds.
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<SearchResponse>;
}
