//! Pipeline orchestration: the fixed linear state machine
//! batch → generate → merge → evaluate → classify → prune → assemble.
//!
//! Each stage reads only the state fields it needs and produces a
//! [`StageUpdate`] delta that the orchestrator folds into the next state:
//! `messages` and `taxonomy_list` grow additively, every other field is
//! replaced wholesale by its producing stage. The first stage failure aborts
//! the run; no partial graph is ever served as if complete.

pub mod batch;
pub mod classify;
pub mod evaluate;
pub mod generate;
pub mod merge;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, TaxogenResult};
use crate::graph::TaxonomyGraph;
use crate::llm::TaxonomyOracle;
use crate::llm::schema::TaxonomyEvaluation;
use crate::taxonomy::Taxonomy;
use crate::taxonomy::prune::prune_unused;
use crate::work::{Work, WorkClassification};

/// The pipeline's stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Batch,
    Generate,
    Merge,
    Evaluate,
    Classify,
    Prune,
    Assemble,
}

impl StageKind {
    /// The fixed linear stage sequence. No branching, no cycles, no retries
    /// at this layer.
    pub const SEQUENCE: [StageKind; 7] = [
        StageKind::Batch,
        StageKind::Generate,
        StageKind::Merge,
        StageKind::Evaluate,
        StageKind::Classify,
        StageKind::Prune,
        StageKind::Assemble,
    ];

    /// Stage name for logs and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Batch => "batch",
            StageKind::Generate => "generate",
            StageKind::Merge => "merge",
            StageKind::Evaluate => "evaluate",
            StageKind::Classify => "classify",
            StageKind::Prune => "prune",
            StageKind::Assemble => "assemble",
        }
    }
}

/// The single context threaded through all stages.
///
/// Fully serializable so a caller can persist a run for caching or
/// resumability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    /// Input documents.
    pub works: Vec<Work>,
    /// Batched prompt payloads; grows additively across runs.
    pub messages: Vec<String>,
    /// One taxonomy per batch; grows additively across runs.
    pub taxonomy_list: Vec<Taxonomy>,
    /// The merged (and later pruned) taxonomy.
    pub merged_taxonomy: Option<Taxonomy>,
    /// Advisory evaluation of the merged taxonomy.
    pub evaluation_report: Option<TaxonomyEvaluation>,
    /// One classification per work, in input order.
    pub work_classifications: Vec<WorkClassification>,
    /// The assembled category/document graph.
    pub final_taxonomy: Option<TaxonomyGraph>,
}

impl PipelineState {
    /// Fresh state over an input corpus.
    pub fn new(works: Vec<Work>) -> Self {
        Self {
            works,
            ..Default::default()
        }
    }

    /// Fold one stage's delta into the state.
    ///
    /// `Batched` and `Generated` append; all other updates replace their
    /// target field wholesale.
    pub fn fold(mut self, update: StageUpdate) -> Self {
        match update {
            StageUpdate::Batched { messages } => self.messages.extend(messages),
            StageUpdate::Generated { taxonomies } => self.taxonomy_list.extend(taxonomies),
            StageUpdate::Merged { taxonomy } => self.merged_taxonomy = taxonomy,
            StageUpdate::Evaluated { report } => self.evaluation_report = report,
            StageUpdate::Classified { classifications } => {
                self.work_classifications = classifications
            }
            StageUpdate::Pruned { taxonomy } => self.merged_taxonomy = taxonomy,
            StageUpdate::Assembled { graph } => self.final_taxonomy = graph,
        }
        self
    }
}

/// One stage's partial update to the pipeline state.
#[derive(Debug, Clone)]
pub enum StageUpdate {
    /// Appended to `messages`.
    Batched { messages: Vec<String> },
    /// Appended to `taxonomy_list`.
    Generated { taxonomies: Vec<Taxonomy> },
    /// Replaces `merged_taxonomy`.
    Merged { taxonomy: Option<Taxonomy> },
    /// Replaces `evaluation_report`.
    Evaluated { report: Option<TaxonomyEvaluation> },
    /// Replaces `work_classifications`.
    Classified {
        classifications: Vec<WorkClassification>,
    },
    /// Replaces `merged_taxonomy` with its pruned rebuild.
    Pruned { taxonomy: Option<Taxonomy> },
    /// Replaces `final_taxonomy`.
    Assembled { graph: Option<TaxonomyGraph> },
}

/// Drives the stage sequence over one oracle and one configuration.
pub struct Orchestrator<'a, O: TaxonomyOracle> {
    oracle: &'a O,
    config: PipelineConfig,
}

impl<'a, O: TaxonomyOracle> Orchestrator<'a, O> {
    /// Create an orchestrator over an oracle and a validated configuration.
    pub fn new(oracle: &'a O, config: PipelineConfig) -> Self {
        Self { oracle, config }
    }

    /// Run the full pipeline over a corpus.
    ///
    /// Passes through every stage in order exactly once and terminates.
    /// Model calls are nondeterministic, so two runs over the same corpus
    /// need not produce the same merged taxonomy.
    pub fn run(&self, works: Vec<Work>) -> TaxogenResult<PipelineState> {
        let mut state = PipelineState::new(works);
        for stage in StageKind::SEQUENCE {
            tracing::info!(stage = stage.name(), "running pipeline stage");
            let update = self
                .run_stage(stage, &state)
                .map_err(|source| PipelineError::Stage {
                    stage: stage.name(),
                    source,
                })?;
            state = state.fold(update);
        }
        Ok(state)
    }

    fn run_stage(
        &self,
        stage: StageKind,
        state: &PipelineState,
    ) -> Result<StageUpdate, crate::error::ModelError> {
        match stage {
            StageKind::Batch => Ok(StageUpdate::Batched {
                messages: batch::plan_batches(
                    &state.works,
                    self.config.batch_size,
                    &self.config.body_field,
                ),
            }),
            StageKind::Generate => generate::run(self.oracle, &state.messages),
            StageKind::Merge => merge::run(self.oracle, &state.taxonomy_list),
            StageKind::Evaluate => evaluate::run(self.oracle, state.merged_taxonomy.as_ref()),
            StageKind::Classify => classify::run(
                self.oracle,
                state.merged_taxonomy.as_ref(),
                &state.works,
                &self.config.body_field,
            ),
            StageKind::Prune => Ok(StageUpdate::Pruned {
                taxonomy: state
                    .merged_taxonomy
                    .as_ref()
                    .map(|t| prune_unused(t, &state.work_classifications)),
            }),
            StageKind::Assemble => Ok(StageUpdate::Assembled {
                graph: state.merged_taxonomy.as_ref().map(|t| {
                    TaxonomyGraph::assemble(t, &state.work_classifications)
                }),
            }),
        }
    }
}
