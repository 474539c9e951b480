//! Classification stage: one independent oracle call per document.

use crate::error::ModelError;
use crate::llm::TaxonomyOracle;
use crate::taxonomy::Taxonomy;
use crate::work::Work;

use super::StageUpdate;

/// Classify every document against the merged taxonomy.
///
/// Calls are independent and order-preserving: classification `i` corresponds
/// to `works[i]`. With no merged taxonomy the classification list is empty and
/// the oracle is not called. A document that fits no category gets an empty
/// category list, not an error.
pub fn run<O: TaxonomyOracle>(
    oracle: &O,
    merged: Option<&Taxonomy>,
    works: &[Work],
    body_field: &str,
) -> Result<StageUpdate, ModelError> {
    let Some(taxonomy) = merged else {
        tracing::info!("no merged taxonomy; skipping classification");
        return Ok(StageUpdate::Classified {
            classifications: Vec::new(),
        });
    };

    let mut classifications = Vec::with_capacity(works.len());
    for (i, work) in works.iter().enumerate() {
        let work_id = work.display_id(i);
        let classification = oracle.classify_work(
            taxonomy,
            &work_id,
            work.title_or_empty(),
            work.field_text(body_field),
        )?;
        tracing::debug!(
            work_id = %work_id,
            categories = classification.categories.len(),
            "classified work"
        );
        classifications.push(classification);
    }
    tracing::info!(works = classifications.len(), "classification complete");
    Ok(StageUpdate::Classified { classifications })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::schema::TaxonomyEvaluation;
    use crate::taxonomy::Category;
    use crate::work::WorkClassification;

    /// Assigns the first leaf whose name appears in the body, else nothing.
    struct KeywordOracle;

    impl TaxonomyOracle for KeywordOracle {
        fn generate_taxonomy(&self, _: &str) -> Result<Taxonomy, ModelError> {
            unimplemented!("not exercised")
        }

        fn merge_taxonomies(&self, _: &[Taxonomy]) -> Result<Taxonomy, ModelError> {
            unimplemented!("not exercised")
        }

        fn evaluate_taxonomy(&self, _: &Taxonomy) -> Result<TaxonomyEvaluation, ModelError> {
            unimplemented!("not exercised")
        }

        fn classify_work(
            &self,
            taxonomy: &Taxonomy,
            work_id: &str,
            title: &str,
            body: &str,
        ) -> Result<WorkClassification, ModelError> {
            let categories = taxonomy
                .leaf_names()
                .into_iter()
                .filter(|name| body.contains(name.as_str()))
                .take(1)
                .collect();
            Ok(WorkClassification {
                work_id: work_id.into(),
                title: title.into(),
                categories,
                rationale: "keyword match".into(),
            })
        }
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(vec![
            Category::new("Systems", "")
                .with_subcategories(vec![Category::new("Scheduling", "")]),
        ])
    }

    #[test]
    fn absent_taxonomy_yields_empty_list_without_error() {
        let works = vec![Work::with_title("A")];
        let StageUpdate::Classified { classifications } =
            run(&KeywordOracle, None, &works, "abstract").unwrap()
        else {
            panic!("wrong update kind");
        };
        assert!(classifications.is_empty());
    }

    #[test]
    fn classifications_are_order_preserving() {
        let works = vec![
            Work::with_title("First").with_field("abstract", "About Scheduling"),
            Work::with_title("Second").with_field("abstract", "Unrelated"),
        ];
        let StageUpdate::Classified { classifications } =
            run(&KeywordOracle, Some(&taxonomy()), &works, "abstract").unwrap()
        else {
            panic!("wrong update kind");
        };
        assert_eq!(classifications.len(), 2);
        assert_eq!(classifications[0].title, "First");
        assert_eq!(classifications[0].categories, vec!["Scheduling"]);
        assert_eq!(classifications[1].title, "Second");
        assert!(classifications[1].categories.is_empty());
    }

    #[test]
    fn works_without_ids_get_ordinal_ids() {
        let works = vec![Work::with_title("A"), Work::with_title("B")];
        let StageUpdate::Classified { classifications } =
            run(&KeywordOracle, Some(&taxonomy()), &works, "abstract").unwrap()
        else {
            panic!("wrong update kind");
        };
        assert_eq!(classifications[0].work_id, "work-0");
        assert_eq!(classifications[1].work_id, "work-1");
    }
}
