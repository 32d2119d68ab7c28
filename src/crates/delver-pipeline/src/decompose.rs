//! Query decomposition
//!
//! Complex queries answer better as several targeted retrievals. The
//! decomposer asks the model to split the query into a JSON array of
//! sub-queries; models wrap JSON in markdown fences often enough that the
//! raw response is scrubbed before parsing. Any failure along the way -
//! generation error, fences the scrub missed, non-array JSON, an empty
//! array - degrades to the single-element fallback `[query]` rather than
//! failing the run: a one-retrieval pass is always a valid plan.

use crate::error::Result;
use delver_llm::GenerativeModel;
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Upper bound on sub-queries per decomposition.
pub const MAX_SUBQUERIES: usize = 15;

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```(?:json)?\s*").unwrap())
}

/// Splits a query into retrievable sub-queries via the generation model.
#[derive(Clone)]
pub struct QueryDecomposer {
    model: Arc<dyn GenerativeModel>,
    max_subqueries: usize,
}

impl QueryDecomposer {
    /// Create a decomposer with the default sub-query cap.
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            max_subqueries: MAX_SUBQUERIES,
        }
    }

    /// Override the sub-query cap.
    pub fn with_max_subqueries(mut self, max_subqueries: usize) -> Self {
        self.max_subqueries = max_subqueries;
        self
    }

    fn prompt(&self, query: &str) -> String {
        format!(
            "You are a helpful assistant that splits a complex user query into multiple simpler sub-queries.\n\
             Only split the query if it contains multiple distinct questions or requests.\n\
             Don't split into more than {max} sub-queries.\n\
             \n\
             Return your result as a list of strings in JSON format.\n\
             Do not include explanations or formatting.\n\
             \n\
             Example 1:\n\
             Input: \"What is retrieval-augmented generation?\"\n\
             Output: [\"What is retrieval-augmented generation?\"]\n\
             \n\
             Example 2:\n\
             Input: \"Tell me the revenue, total workers, culture and location of company X\"\n\
             Output: [\"Tell me the revenue of company X\", \"Tell me the total workers of company X\", \"Tell me the culture of company X\", \"Tell me the location of company X\"]\n\
             \n\
             Now, split this query:\n\
             \"{query}\"",
            max = self.max_subqueries,
        )
    }

    /// Decompose `query` into sub-queries.
    ///
    /// Never fails: unparseable or failed decompositions fall back to
    /// `[query]` with a warning, so the pipeline always has something to
    /// retrieve.
    pub async fn decompose(&self, query: &str) -> Result<Vec<String>> {
        let raw = match self.model.generate(&self.prompt(query)).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "decomposition call failed, using the query as-is");
                return Ok(vec![query.to_string()]);
            }
        };

        match self.parse(&raw) {
            Some(subqueries) => {
                tracing::debug!(count = subqueries.len(), "query decomposed");
                Ok(subqueries)
            }
            None => {
                tracing::warn!("unparseable decomposition response, using the query as-is");
                Ok(vec![query.to_string()])
            }
        }
    }

    fn parse(&self, raw: &str) -> Option<Vec<String>> {
        let cleaned = fence_pattern().replace_all(raw.trim(), "");
        let cleaned = cleaned.trim_end_matches('`');

        let parsed: Vec<String> = serde_json::from_str(cleaned).ok()?;
        if parsed.is_empty() {
            return None;
        }
        Some(parsed.into_iter().take(self.max_subqueries).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedModel {
        response: String,
    }

    #[async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate(&self, _prompt: &str) -> delver_llm::Result<String> {
            Ok(self.response.clone())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl GenerativeModel for FailingModel {
        async fn generate(&self, _prompt: &str) -> delver_llm::Result<String> {
            Err(delver_llm::GenerationError::Provider("down".to_string()))
        }
    }

    fn decomposer(response: &str) -> QueryDecomposer {
        QueryDecomposer::new(Arc::new(CannedModel {
            response: response.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_parses_plain_json_array() {
        let subqueries = decomposer(r#"["a", "b"]"#).decompose("a and b").await.unwrap();
        assert_eq!(subqueries, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_strips_markdown_fences() {
        let subqueries = decomposer("```json\n[\"a\", \"b\"]\n```")
            .decompose("a and b")
            .await
            .unwrap();
        assert_eq!(subqueries, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_garbage_falls_back_to_query() {
        let subqueries = decomposer("here are your subqueries: a, b")
            .decompose("a and b")
            .await
            .unwrap();
        assert_eq!(subqueries, vec!["a and b"]);
    }

    #[tokio::test]
    async fn test_empty_array_falls_back_to_query() {
        let subqueries = decomposer("[]").decompose("q").await.unwrap();
        assert_eq!(subqueries, vec!["q"]);
    }

    #[tokio::test]
    async fn test_generation_failure_falls_back_to_query() {
        let decomposer = QueryDecomposer::new(Arc::new(FailingModel));
        let subqueries = decomposer.decompose("q").await.unwrap();
        assert_eq!(subqueries, vec!["q"]);
    }

    #[tokio::test]
    async fn test_truncates_to_cap() {
        let many: Vec<String> = (0..20).map(|i| format!("q{i}")).collect();
        let json = serde_json::to_string(&many).unwrap();
        let subqueries = decomposer(&json).decompose("big").await.unwrap();
        assert_eq!(subqueries.len(), MAX_SUBQUERIES);
    }
}
