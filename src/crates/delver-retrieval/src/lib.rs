//! # delver-retrieval
//!
//! Evidence retrieval for delver runs: the [`SearchProvider`] trait, the
//! Tavily HTTP client, and the [`RetrievalAdapter`] that layers adaptive
//! depth selection, fail-fast validation, bounded retry/backoff, and
//! confidence-based evidence filtering on top of any provider.
//!
//! ```text
//! sub-query ──► validate (≤400 chars) ──► depth rule ──► provider.search
//!                                                            │ transient?
//!                                                            ▼
//!                                                      retry ≤3, 2s..10s
//!                                                            │
//!                EvidenceFilter (score band, max 4) ◄────────┘
//!                                                            │
//!                         evidence block ("title:\ncontent") ▼
//! ```

pub mod adapter;
pub mod error;
pub mod filter;
pub mod provider;
pub mod tavily;

// Re-export main types
pub use adapter::{select_depth, RetrievalAdapter, MAX_QUERY_LEN};
pub use error::{RetrievalError, Result};
pub use filter::{EvidenceFilter, NO_CONFIDENT_RESULTS, NO_RESULTS};
pub use provider::{SearchDepth, SearchProvider, SearchResponse, SearchResult};
pub use tavily::{TavilyClient, TavilyConfig};
