//! Generation stage: one taxonomy per batch payload.

use crate::error::ModelError;
use crate::llm::TaxonomyOracle;

use super::StageUpdate;

/// Invoke the oracle once per batch payload, in order.
///
/// The invocation set is all-or-nothing: the first failing batch aborts the
/// stage and its error propagates.
pub fn run<O: TaxonomyOracle>(oracle: &O, messages: &[String]) -> Result<StageUpdate, ModelError> {
    let mut taxonomies = Vec::with_capacity(messages.len());
    for (i, payload) in messages.iter().enumerate() {
        let taxonomy = oracle.generate_taxonomy(payload)?;
        tracing::debug!(
            batch = i + 1,
            categories = taxonomy.category_count(),
            "generated batch taxonomy"
        );
        taxonomies.push(taxonomy);
    }
    tracing::info!(batches = taxonomies.len(), "taxonomy generation complete");
    Ok(StageUpdate::Generated { taxonomies })
}
