//! The research pipeline graph
//!
//! Wires decomposition, retrieval, synthesis, critique, and publication into
//! one checkpointed run graph:
//!
//! ```text
//! START ─► parse ─► search_context ─► synthesize ─► critique ─┬─► publish ─► END
//!                        ▲                                    │
//!                        └─────────────── "retry" ◄───────────┘
//! ```
//!
//! The critique's conditional edge is the only cycle; the engine's iteration
//! cap bounds it, so a critic that never approves still terminates with a
//! degraded (but present) answer.

use crate::critic::{route, AnswerSynthesizer, Critic};
use crate::decompose::QueryDecomposer;
use crate::error::Result;
use crate::publish;
use crate::state::RunState;
use delver_checkpoint::{CheckpointSaver, InMemorySaver};
use delver_graph::builder::GraphBuilder;
use delver_graph::graph::{NodeKind, END, START};
use delver_graph::visualization::to_mermaid;
use delver_graph::{CompiledGraph, RunReport};
use delver_llm::GenerativeModel;
use delver_retrieval::{RetrievalAdapter, SearchProvider, SearchResponse};
use std::collections::HashMap;
use std::sync::Arc;

/// Tunable settings for a pipeline instance.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Print each sub-query as it is retrieved (only when the decomposition
    /// actually split the query)
    pub show_subqueries: bool,

    /// Upper bound on executions of any single node within a run; bounds the
    /// critique/retry loop
    pub max_iterations: usize,

    /// Suppress console banners (used by tests and embedding callers)
    pub quiet: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            show_subqueries: false,
            max_iterations: 3,
            quiet: false,
        }
    }
}

/// A compiled, checkpointed research pipeline.
pub struct ResearchPipeline {
    graph: CompiledGraph,
    saver: Arc<dyn CheckpointSaver>,
    config: PipelineConfig,
}

impl ResearchPipeline {
    /// Build the pipeline with an in-memory checkpoint saver.
    ///
    /// RAM-backed checkpoints suit a locally run session; a durable saver
    /// plugs in through [`with_saver`](Self::with_saver) unchanged.
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        provider: Arc<dyn SearchProvider>,
        config: PipelineConfig,
    ) -> Result<Self> {
        Self::with_saver(model, provider, config, Arc::new(InMemorySaver::new()))
    }

    /// Build the pipeline against a specific checkpoint saver.
    pub fn with_saver(
        model: Arc<dyn GenerativeModel>,
        provider: Arc<dyn SearchProvider>,
        config: PipelineConfig,
        saver: Arc<dyn CheckpointSaver>,
    ) -> Result<Self> {
        let decomposer = QueryDecomposer::new(model.clone());
        let adapter = RetrievalAdapter::new(provider);
        let synthesizer = AnswerSynthesizer::new(model.clone());
        let critic = Critic::new(model);

        let mut builder = GraphBuilder::new();

        let quiet = config.quiet;
        builder.add_node("parse", NodeKind::AsyncCapable, move |state| {
            let decomposer = decomposer.clone();
            Box::pin(async move {
                let run = RunState::from_value(&state)?;
                if !quiet {
                    publish::print_banner(&run.query, "Human Query", publish::COLOR_QUERY);
                }
                let subqueries = decomposer.decompose(&run.query).await?;
                Ok(serde_json::json!({ "subqueries": subqueries }))
            })
        });

        let show_subqueries = config.show_subqueries && !config.quiet;
        builder.add_node("search_context", NodeKind::AsyncCapable, move |state| {
            let adapter = adapter.clone();
            Box::pin(async move {
                let run = RunState::from_value(&state)?;
                if show_subqueries && run.subqueries.len() > 1 {
                    for subquery in &run.subqueries {
                        publish::print_banner(subquery, "Sub Query", publish::COLOR_SUBQUERY);
                    }
                }
                let combined_context = adapter.gather_context(&run.subqueries).await?;
                Ok(serde_json::json!({ "combined_context": combined_context }))
            })
        });

        builder.add_node("synthesize", NodeKind::AsyncCapable, move |state| {
            let synthesizer = synthesizer.clone();
            Box::pin(async move {
                let run = RunState::from_value(&state)?;
                let response = synthesizer
                    .synthesize(&run.query, &run.combined_context)
                    .await?;
                Ok(serde_json::json!({ "response": response }))
            })
        });

        builder.add_node("critique", NodeKind::AsyncCapable, move |state| {
            let critic = critic.clone();
            Box::pin(async move {
                let run = RunState::from_value(&state)?;
                let verdict = critic
                    .critique(&run.query, &run.combined_context, &run.response)
                    .await?;
                Ok(serde_json::json!({ "revised_response": verdict }))
            })
        });

        builder.add_node("publish", NodeKind::Sync, move |state| {
            Box::pin(async move {
                let run = RunState::from_value(&state)?;
                if !quiet {
                    publish::print_response(&run.response);
                }
                Ok(serde_json::json!({}))
            })
        });

        builder.add_edge(START, "parse");
        builder.add_edge("parse", "search_context");
        builder.add_edge("search_context", "synthesize");
        builder.add_edge("synthesize", "critique");
        builder.add_conditional_edge(
            "critique",
            Arc::new(|state| {
                let verdict = state["revised_response"].as_str().unwrap_or("");
                route(verdict).as_label().to_string()
            }),
            HashMap::from([
                ("retry".to_string(), "search_context".to_string()),
                ("publish".to_string(), "publish".to_string()),
            ]),
        );
        builder.add_edge("publish", END);

        let graph = builder.compile()?.with_saver(saver.clone());

        Ok(Self {
            graph,
            saver,
            config,
        })
    }

    /// Execute (or resume) a run for `query` under `run_id`.
    #[tracing::instrument(skip(self, query), fields(run_id = %run_id))]
    pub async fn run(&self, query: &str, run_id: &str) -> Result<RunReport> {
        let input = RunState::new(query).to_value()?;
        Ok(self
            .graph
            .run(input, run_id, self.config.max_iterations)
            .await?)
    }

    /// The checkpoint saver backing this pipeline.
    pub fn saver(&self) -> &Arc<dyn CheckpointSaver> {
        &self.saver
    }

    /// Mermaid rendering of the pipeline topology.
    pub fn mermaid(&self) -> String {
        to_mermaid(self.graph.graph())
    }
}

/// Render the pipeline topology without constructing real providers.
///
/// The topology is fixed at build time; inert stand-ins satisfy the
/// constructor and are never invoked.
pub fn mermaid_topology() -> Result<String> {
    struct Inert;

    #[async_trait::async_trait]
    impl GenerativeModel for Inert {
        async fn generate(&self, _prompt: &str) -> delver_llm::Result<String> {
            Err(delver_llm::GenerationError::Config(
                "topology-only model".to_string(),
            ))
        }
    }

    #[async_trait::async_trait]
    impl SearchProvider for Inert {
        async fn search(
            &self,
            _query: &str,
            _depth: delver_retrieval::SearchDepth,
        ) -> delver_retrieval::Result<SearchResponse> {
            Err(delver_retrieval::RetrievalError::Config(
                "topology-only provider".to_string(),
            ))
        }
    }

    let pipeline = ResearchPipeline::new(
        Arc::new(Inert),
        Arc::new(Inert),
        PipelineConfig {
            quiet: true,
            ..PipelineConfig::default()
        },
    )?;
    Ok(pipeline.mermaid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use delver_checkpoint::Checkpoint;
    use delver_graph::RunOutcome;
    use delver_retrieval::{SearchDepth, SearchResponse, SearchResult};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Model stub that answers each prompt kind deterministically and counts
    /// decomposition calls.
    struct StubModel {
        subqueries_json: String,
        verdict: String,
        decompose_calls: AtomicUsize,
    }

    impl StubModel {
        fn new(subqueries_json: &str, verdict: &str) -> Self {
            Self {
                subqueries_json: subqueries_json.to_string(),
                verdict: verdict.to_string(),
                decompose_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for StubModel {
        async fn generate(&self, prompt: &str) -> delver_llm::Result<String> {
            if prompt.contains("sub-queries") {
                self.decompose_calls.fetch_add(1, Ordering::SeqCst);
                Ok(self.subqueries_json.clone())
            } else if prompt.contains("reviewing and improving") {
                Ok(self.verdict.clone())
            } else {
                Ok("synthesized answer".to_string())
            }
        }
    }

    /// Provider stub returning one high-confidence result per call.
    struct StubProvider {
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for StubProvider {
        async fn search(
            &self,
            query: &str,
            _depth: SearchDepth,
        ) -> delver_retrieval::Result<SearchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SearchResponse {
                results: vec![SearchResult {
                    title: format!("source for {query}"),
                    content: "evidence".to_string(),
                    score: 0.9,
                }],
            })
        }
    }

    fn quiet_config() -> PipelineConfig {
        PipelineConfig {
            quiet: true,
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_approved_run_completes_in_one_pass() {
        let model = Arc::new(StubModel::new(r#"["what is rust"]"#, "ok"));
        let provider = Arc::new(StubProvider::new());
        let pipeline =
            ResearchPipeline::new(model.clone(), provider.clone(), quiet_config()).unwrap();

        let report = pipeline.run("what is rust", "run-1").await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.state["response"], "synthesized answer");
        assert_eq!(report.state["revised_response"], "ok");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        // One checkpoint per completed node, in execution order.
        let history = pipeline.saver().list("run-1").await.unwrap();
        let nodes: Vec<&str> = history.iter().map(|cp| cp.node.as_str()).collect();
        assert_eq!(
            nodes,
            vec!["parse", "search_context", "synthesize", "critique", "publish"]
        );
    }

    #[tokio::test]
    async fn test_hostile_critic_degrades_after_three_retrieval_passes() {
        let model = Arc::new(StubModel::new(r#"["q"]"#, "inaccurate"));
        let provider = Arc::new(StubProvider::new());
        let pipeline =
            ResearchPipeline::new(model.clone(), provider.clone(), quiet_config()).unwrap();

        let report = pipeline.run("q", "run-1").await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Degraded);
        // Exactly three retrieval passes (one provider call each), never more.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        // The degraded state still carries the best available answer.
        assert_eq!(report.state["response"], "synthesized answer");
    }

    #[tokio::test]
    async fn test_unparseable_decomposition_retrieves_the_raw_query() {
        let model = Arc::new(StubModel::new("not json at all", "ok"));
        let provider = Arc::new(StubProvider::new());
        let pipeline = ResearchPipeline::new(model, provider, quiet_config()).unwrap();

        let report = pipeline.run("the raw query", "run-1").await.unwrap();

        assert_eq!(report.state["subqueries"], json!(["the raw query"]));
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn test_runs_are_deterministic() {
        let make = || {
            let model = Arc::new(StubModel::new(r#"["a", "b"]"#, "ok"));
            let provider = Arc::new(StubProvider::new());
            ResearchPipeline::new(model, provider, quiet_config()).unwrap()
        };

        let first_pipeline = make();
        let second_pipeline = make();
        let first = first_pipeline.run("a and b", "run-1").await.unwrap();
        let second = second_pipeline.run("a and b", "run-1").await.unwrap();

        assert_eq!(first.state, second.state);
        assert_eq!(first.steps, second.steps);

        // Checkpoint sequences match node for node, seq for seq.
        let project = |history: Vec<Checkpoint>| -> Vec<(u64, String)> {
            history.into_iter().map(|cp| (cp.seq, cp.node)).collect()
        };
        let first_history = project(first_pipeline.saver().list("run-1").await.unwrap());
        let second_history = project(second_pipeline.saver().list("run-1").await.unwrap());
        assert_eq!(first_history, second_history);
    }

    #[tokio::test]
    async fn test_resume_after_synthesis_skips_earlier_nodes() {
        let model = Arc::new(StubModel::new(r#"["q"]"#, "ok"));
        let provider = Arc::new(StubProvider::new());
        let saver: Arc<dyn CheckpointSaver> = Arc::new(InMemorySaver::new());

        // Simulate a run interrupted right after synthesis.
        let snapshot = json!({
            "query": "q",
            "subqueries": ["q"],
            "combined_context": "source for q:\nevidence\n\n",
            "response": "synthesized answer",
            "revised_response": "",
        });
        for (seq, node) in ["parse", "search_context", "synthesize"].iter().enumerate() {
            saver
                .put(Checkpoint::new("run-1", seq as u64, *node, snapshot.clone()))
                .await
                .unwrap();
        }

        let pipeline = ResearchPipeline::with_saver(
            model.clone(),
            provider.clone(),
            quiet_config(),
            saver.clone(),
        )
        .unwrap();
        let report = pipeline.run("q", "run-1").await.unwrap();

        // Re-entered at critique: no new decomposition or retrieval.
        assert_eq!(model.decompose_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.steps, 2); // critique + publish

        let history = saver.list("run-1").await.unwrap();
        let nodes: Vec<&str> = history.iter().map(|cp| cp.node.as_str()).collect();
        assert_eq!(
            nodes,
            vec!["parse", "search_context", "synthesize", "critique", "publish"]
        );
    }

    #[tokio::test]
    async fn test_mermaid_names_every_node() {
        let model = Arc::new(StubModel::new(r#"["q"]"#, "ok"));
        let provider = Arc::new(StubProvider::new());
        let pipeline = ResearchPipeline::new(model, provider, quiet_config()).unwrap();

        let diagram = pipeline.mermaid();
        for node in ["parse", "search_context", "synthesize", "critique", "publish"] {
            assert!(diagram.contains(node), "missing {node} in:\n{diagram}");
        }
    }
}
