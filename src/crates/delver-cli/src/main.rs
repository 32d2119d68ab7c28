//! # delver-cli
//!
//! Command-line front end for delver research runs. `delver run` executes a
//! query through the full pipeline (credentials come from `COHERE_API_KEY`
//! and `TAVILY_API_KEY`); `delver graph` prints the pipeline topology as a
//! mermaid diagram.

use anyhow::Context;
use clap::{Parser, Subcommand};
use delver_graph::RunOutcome;
use delver_llm::CohereClient;
use delver_pipeline::{mermaid_topology, PipelineConfig, ResearchPipeline};
use delver_retrieval::{TavilyClient, TavilyConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "delver")]
#[command(about = "delver - checkpointed research runs over a critique loop", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a research query through the pipeline
    Run {
        /// The query to research
        query: String,

        /// Upper bound on executions of any single pipeline stage
        #[arg(long, default_value_t = 3)]
        max_iterations: usize,

        /// Print each sub-query as it is retrieved
        #[arg(long)]
        show_subqueries: bool,

        /// Run identifier (random when omitted); reuse one to resume a run
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Print the pipeline topology as a mermaid diagram
    Graph,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            query,
            max_iterations,
            show_subqueries,
            run_id,
        } => {
            let model = CohereClient::from_env().context("configuring the generation model")?;
            let provider = TavilyClient::new(TavilyConfig::from_env()?)
                .context("configuring the search provider")?;

            let pipeline = ResearchPipeline::new(
                Arc::new(model),
                Arc::new(provider),
                PipelineConfig {
                    show_subqueries,
                    max_iterations,
                    quiet: false,
                },
            )?;

            let run_id = run_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let report = pipeline.run(&query, &run_id).await?;

            if report.outcome == RunOutcome::Degraded {
                tracing::warn!(
                    run_id = %run_id,
                    iterations = report.iterations,
                    "iteration cap reached; published the best available answer"
                );
            }
        }
        Commands::Graph => {
            println!("{}", mermaid_topology()?);
        }
    }

    Ok(())
}
