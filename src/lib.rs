//! # taxogen
//!
//! LLM-driven topic taxonomy construction and graph assembly for document
//! corpora.
//!
//! ## Architecture
//!
//! - **Taxonomy** (`taxonomy`): recursive category trees with flattening,
//!   copy-on-write pruning, and a leveled block decomposition for layout
//! - **Model boundary** (`llm`): the [`llm::TaxonomyOracle`] trait with an
//!   Ollama-backed implementation; structured output is parse-and-validate,
//!   never coerced
//! - **Pipeline** (`pipeline`): a fixed linear state machine batching the
//!   corpus, generating per-batch taxonomies, merging, evaluating,
//!   classifying, pruning, and assembling the final graph
//! - **Graph** (`graph`): petgraph-backed directed graph of category and
//!   document nodes for rendering consumers
//!
//! ## Library usage
//!
//! ```no_run
//! use taxogen::config::PipelineConfig;
//! use taxogen::llm::{OllamaClient, OllamaConfig};
//! use taxogen::pipeline::Orchestrator;
//! use taxogen::work::Work;
//!
//! let mut client = OllamaClient::new(OllamaConfig::default());
//! client.probe();
//! let config = PipelineConfig::default();
//! let works = vec![Work::with_title("Paper A"), Work::with_title("Paper B")];
//! let state = Orchestrator::new(&client, config).run(works).unwrap();
//! println!("{} classifications", state.work_classifications.len());
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod pipeline;
pub mod taxonomy;
pub mod work;
