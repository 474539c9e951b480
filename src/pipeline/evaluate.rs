//! Evaluation stage: advisory quality scoring of the merged taxonomy.

use crate::error::ModelError;
use crate::llm::TaxonomyOracle;
use crate::taxonomy::Taxonomy;

use super::StageUpdate;

/// Score the merged taxonomy, if one exists.
///
/// With no merged taxonomy the report stays absent and the oracle is not
/// called. The report never gates downstream stages.
pub fn run<O: TaxonomyOracle>(
    oracle: &O,
    merged: Option<&Taxonomy>,
) -> Result<StageUpdate, ModelError> {
    let Some(taxonomy) = merged else {
        tracing::info!("no merged taxonomy to evaluate");
        return Ok(StageUpdate::Evaluated { report: None });
    };
    let report = oracle.evaluate_taxonomy(taxonomy)?;
    tracing::info!(
        coverage = report.coverage,
        structure = report.structure,
        description_quality = report.description_quality,
        "taxonomy evaluated"
    );
    Ok(StageUpdate::Evaluated {
        report: Some(report),
    })
}
