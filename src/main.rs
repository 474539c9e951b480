//! taxogen CLI: LLM-driven topic taxonomy construction.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use taxogen::config::PipelineConfig;
use taxogen::error::ModelError;
use taxogen::llm::OllamaClient;
use taxogen::pipeline::Orchestrator;
use taxogen::taxonomy::Taxonomy;
use taxogen::work::Work;

#[derive(Parser)]
#[command(name = "taxogen", version, about = "LLM-driven topic taxonomy construction")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over a JSON works file.
    Run {
        /// Path to a JSON array of work records.
        #[arg(long)]
        works: PathBuf,

        /// Documents per generation batch.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Document field holding the body text.
        #[arg(long)]
        body_field: Option<String>,

        /// Ollama model name.
        #[arg(long)]
        model: Option<String>,

        /// Ollama base URL.
        #[arg(long)]
        ollama_url: Option<String>,

        /// Write the assembled graph as JSON to this path (default: stdout).
        #[arg(long)]
        graph_out: Option<PathBuf>,

        /// Write the entire pipeline state as JSON to this path.
        #[arg(long)]
        state_out: Option<PathBuf>,
    },

    /// Print the leveled block decomposition of a taxonomy JSON file.
    Level {
        /// Path to a taxonomy JSON file.
        #[arg(long)]
        taxonomy: PathBuf,

        /// Maximum rendered label length.
        #[arg(long, default_value = "25")]
        max_label_chars: usize,
    },

    /// Print pre-order category paths of a taxonomy JSON file.
    Flatten {
        /// Path to a taxonomy JSON file.
        #[arg(long)]
        taxonomy: PathBuf,

        /// Path separator between ancestor names.
        #[arg(long, default_value = " > ")]
        separator: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Run {
            works,
            batch_size,
            body_field,
            model,
            ollama_url,
            graph_out,
            state_out,
        } => {
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            if let Some(body_field) = body_field {
                config.body_field = body_field;
            }
            if let Some(model) = model {
                config.ollama.model = model;
            }
            if let Some(url) = ollama_url {
                config.ollama.base_url = url;
            }
            config.validate()?;

            let content = std::fs::read_to_string(&works).into_diagnostic()?;
            let works: Vec<Work> = serde_json::from_str(&content).into_diagnostic()?;
            println!("Loaded {} works from input", works.len());

            let mut client = OllamaClient::new(config.ollama.clone());
            if !client.probe() {
                return Err(ModelError::Unavailable {
                    url: config.ollama.base_url.clone(),
                }
                .into());
            }
            if !client.has_model() {
                tracing::warn!(
                    model = client.model(),
                    "configured model not in local model list; the server may pull it on demand"
                );
            }

            let state = Orchestrator::new(&client, config).run(works)?;

            println!("Batches: {}", state.messages.len());
            println!(
                "Merged taxonomy: {} categories",
                state
                    .merged_taxonomy
                    .as_ref()
                    .map(Taxonomy::category_count)
                    .unwrap_or(0)
            );
            if let Some(report) = &state.evaluation_report {
                println!(
                    "Evaluation: coverage {}/5, structure {}/5, descriptions {}/5",
                    report.coverage, report.structure, report.description_quality
                );
            }
            println!("Classified works: {}", state.work_classifications.len());

            if let Some(path) = &state_out {
                let json = serde_json::to_string_pretty(&state).into_diagnostic()?;
                std::fs::write(path, json).into_diagnostic()?;
                println!("Pipeline state written to {}", path.display());
            }

            if let Some(graph) = &state.final_taxonomy {
                let json = serde_json::to_string_pretty(graph).into_diagnostic()?;
                match &graph_out {
                    Some(path) => {
                        std::fs::write(path, json).into_diagnostic()?;
                        println!(
                            "Graph ({} nodes, {} edges) written to {}",
                            graph.node_count(),
                            graph.edge_count(),
                            path.display()
                        );
                    }
                    None => println!("{json}"),
                }
            } else {
                println!("No graph assembled (empty corpus).");
            }
        }

        Commands::Level {
            taxonomy,
            max_label_chars,
        } => {
            let taxonomy = load_taxonomy(&taxonomy)?;
            let state = taxonomy.to_nested_block_state(max_label_chars);
            println!("Levels: {}", state.level_count());
            for level in &state.levels {
                println!(
                    "  depth {}: {} non-empty block(s)",
                    level.depth, level.non_empty_blocks
                );
                for (id, label) in &level.vertex_text {
                    println!("    {id}: {label}");
                }
            }
        }

        Commands::Flatten {
            taxonomy,
            separator,
        } => {
            let taxonomy = load_taxonomy(&taxonomy)?;
            for path in taxonomy.flatten_paths(&separator) {
                println!("{path}");
            }
        }
    }

    Ok(())
}

fn load_taxonomy(path: &PathBuf) -> Result<Taxonomy> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    serde_json::from_str(&content).into_diagnostic()
}
