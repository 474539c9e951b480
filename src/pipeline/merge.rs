//! Merge stage: combine all per-batch taxonomies into one hierarchy.

use crate::error::ModelError;
use crate::llm::TaxonomyOracle;
use crate::taxonomy::Taxonomy;

use super::StageUpdate;

/// Merge the accumulated per-batch taxonomies with one oracle call.
///
/// An empty batch list is a legitimate empty state, not a failure: the merged
/// taxonomy stays absent and the oracle is not called.
pub fn run<O: TaxonomyOracle>(oracle: &O, batches: &[Taxonomy]) -> Result<StageUpdate, ModelError> {
    if batches.is_empty() {
        tracing::info!("no batch taxonomies to merge");
        return Ok(StageUpdate::Merged { taxonomy: None });
    }
    let merged = oracle.merge_taxonomies(batches)?;
    tracing::info!(
        batches = batches.len(),
        categories = merged.category_count(),
        "merged batch taxonomies"
    );
    Ok(StageUpdate::Merged {
        taxonomy: Some(merged),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::schema::TaxonomyEvaluation;
    use crate::taxonomy::Category;
    use crate::work::WorkClassification;

    /// Concatenates top-level categories; the real merge is semantic and
    /// nondeterministic, so tests only rely on structural outcomes.
    struct UnionOracle;

    impl TaxonomyOracle for UnionOracle {
        fn generate_taxonomy(&self, _: &str) -> Result<Taxonomy, ModelError> {
            unimplemented!("not exercised")
        }

        fn merge_taxonomies(&self, batches: &[Taxonomy]) -> Result<Taxonomy, ModelError> {
            Ok(Taxonomy::new(
                batches
                    .iter()
                    .flat_map(|t| t.category_list.clone())
                    .collect(),
            ))
        }

        fn evaluate_taxonomy(&self, _: &Taxonomy) -> Result<TaxonomyEvaluation, ModelError> {
            unimplemented!("not exercised")
        }

        fn classify_work(
            &self,
            _: &Taxonomy,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<WorkClassification, ModelError> {
            unimplemented!("not exercised")
        }
    }

    #[test]
    fn empty_batch_list_merges_to_absent_without_error() {
        let StageUpdate::Merged { taxonomy } = run(&UnionOracle, &[]).unwrap() else {
            panic!("wrong update kind");
        };
        assert!(taxonomy.is_none());
    }

    #[test]
    fn non_empty_batches_merge_to_a_valid_tree() {
        let batches = vec![
            Taxonomy::new(vec![Category::new("A", "")]),
            Taxonomy::new(vec![Category::new("B", "")]),
        ];
        let StageUpdate::Merged { taxonomy } = run(&UnionOracle, &batches).unwrap() else {
            panic!("wrong update kind");
        };
        let merged = taxonomy.unwrap();
        assert!(!merged.is_empty());
        assert_eq!(merged.max_depth(), 1);
    }
}
