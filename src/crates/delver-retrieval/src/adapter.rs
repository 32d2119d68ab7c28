//! The retrieval adapter: adaptive depth, bounded retry, ordered aggregation
//!
//! [`RetrievalAdapter`] wraps a [`SearchProvider`] with the policies the run
//! graph relies on:
//!
//! - **Depth selection** - long sub-queries or many of them justify the
//!   slower `advanced` depth; short, few sub-queries stay `basic`. A
//!   precision/latency tradeoff, decided per sub-query.
//! - **Fail-fast validation** - oversized queries (> 400 chars) are a
//!   [`RetrievalError::Config`] before any attempt is made.
//! - **Bounded retry** - transient provider failures retry up to 3 attempts
//!   with 2s-to-10s backoff; on exhaustion the last provider error is
//!   returned unchanged, never substituted.
//! - **Aggregation** - sub-queries are retrieved strictly sequentially, in
//!   order, and their filtered evidence blocks joined by a blank line into
//!   `combined_context`. Sequential on purpose: it keeps provider load and
//!   result ordering trivial to reason about. Bounded concurrent fan-out with
//!   order-preserving reassembly would be a drop-in improvement here.

use crate::error::{RetrievalError, Result};
use crate::filter::EvidenceFilter;
use crate::provider::{SearchDepth, SearchProvider};
use delver_graph::RetryPolicy;
use std::sync::Arc;

/// Hard provider limit on query length in characters, enforced before any
/// attempt.
pub const MAX_QUERY_LEN: usize = 400;

/// Sub-query word count above which retrieval goes deep.
const ADVANCED_WORD_THRESHOLD: usize = 8;

/// Sub-query count above which every retrieval goes deep.
const ADVANCED_COUNT_THRESHOLD: usize = 3;

/// Pick the retrieval depth for one sub-query.
///
/// `Advanced` iff the sub-query has more than 8 words or the decomposition
/// produced more than 3 sub-queries; otherwise `Basic`.
pub fn select_depth(subquery: &str, total_subqueries: usize) -> SearchDepth {
    let words = subquery.split_whitespace().count();
    if words > ADVANCED_WORD_THRESHOLD || total_subqueries > ADVANCED_COUNT_THRESHOLD {
        SearchDepth::Advanced
    } else {
        SearchDepth::Basic
    }
}

/// Provider wrapper applying depth selection, retry, and evidence filtering.
#[derive(Clone)]
pub struct RetrievalAdapter {
    provider: Arc<dyn SearchProvider>,
    policy: RetryPolicy,
    filter: EvidenceFilter,
}

impl RetrievalAdapter {
    /// Wrap a provider with the default retrieval policy and filter.
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            policy: RetryPolicy::retrieval(),
            filter: EvidenceFilter::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the evidence filter settings.
    pub fn with_filter(mut self, filter: EvidenceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Retrieve and filter evidence for one sub-query.
    ///
    /// `total_subqueries` is the size of the decomposition this sub-query
    /// belongs to; it feeds depth selection.
    pub async fn retrieve(&self, subquery: &str, total_subqueries: usize) -> Result<String> {
        let query_chars = subquery.chars().count();
        if query_chars > MAX_QUERY_LEN {
            return Err(RetrievalError::Config(format!(
                "query is too long: {query_chars} characters (max {MAX_QUERY_LEN})"
            )));
        }

        let depth = select_depth(subquery, total_subqueries);
        let mut attempt = 0;

        let response = loop {
            match self.provider.search(subquery, depth).await {
                Ok(response) => break response,
                Err(e) if e.is_transient() && self.policy.should_retry(attempt + 1) => {
                    let delay = self.policy.calculate_delay(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        ?delay,
                        error = %e,
                        "transient retrieval failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                // Config errors and exhausted retries: the original error,
                // unchanged.
                Err(e) => return Err(e),
            }
        };

        Ok(self.filter.format(&response.results))
    }

    /// Retrieve evidence for every sub-query and combine the blocks.
    ///
    /// Sub-queries are processed one at a time, in order; the combined
    /// context is the blank-line-joined concatenation of their evidence
    /// blocks and reflects only this pass's retrieval.
    pub async fn gather_context(&self, subqueries: &[String]) -> Result<String> {
        let mut blocks = Vec::with_capacity(subqueries.len());
        for subquery in subqueries {
            blocks.push(self.retrieve(subquery, subqueries.len()).await?);
        }
        Ok(blocks.join("\n\n"))
    }
}
