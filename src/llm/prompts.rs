//! Fixed system instructions and payload rendering for the four oracle tasks.

use crate::taxonomy::Taxonomy;

/// System instruction for per-batch taxonomy generation.
pub const GENERATE_SYSTEM: &str = "You are a taxonomy construction assistant. \
    Build a hierarchical, non-redundant topic taxonomy strictly grounded in the \
    given document texts. Do not invent topics absent from the input, and do not \
    list the input documents themselves as categories. Give every category a \
    short name and a one-sentence description. \
    Return only a JSON object with a \"category_list\" array; each category has \
    \"name\", \"description\", and \"subcategories\" (an array of the same shape, \
    empty for leaves). No other text.";

/// System instruction for merging per-batch taxonomies.
pub const MERGE_SYSTEM: &str = "You are a taxonomy merging assistant. \
    Combine the given batch taxonomies into one hierarchy: merge overlapping \
    categories, preserve meaningful distinctions, and keep the hierarchy \
    balanced. \
    Return only a JSON object with a \"category_list\" array; each category has \
    \"name\", \"description\", and \"subcategories\" (an array of the same shape, \
    empty for leaves). No other text.";

/// System instruction for evaluating a merged taxonomy.
pub const EVALUATE_SYSTEM: &str = "You are a taxonomy quality reviewer. \
    Score the given taxonomy on three 1-5 scales, grounding your judgement in \
    the taxonomy's own category names and descriptions. \
    Return only a JSON object with integer fields \"coverage\", \"structure\", \
    and \"description_quality\", string fields \"strengths\" and \"gaps\", and an \
    \"action_items\" array of strings. No other text.";

/// System instruction for classifying one document against a taxonomy.
pub const CLASSIFY_SYSTEM: &str = "You are a document classification assistant. \
    Assign the document zero or more categories from the given taxonomy, using \
    only the names of leaf categories (the most specific level). If the document \
    fits no category with confidence, assign none. \
    Return only a JSON object with a \"categories\" array of category names and \
    a \"rationale\" string explaining the assignment. No other text.";

/// Render the merge payload: each batch taxonomy under a 1-based index label.
pub fn merge_payload(batches: &[Taxonomy]) -> String {
    let mut out = String::new();
    for (i, taxonomy) in batches.iter().enumerate() {
        out.push_str(&format!("Taxonomy {}:\n", i + 1));
        out.push_str(&taxonomy.render_outline());
        out.push('\n');
    }
    out
}

/// Render the evaluation payload from the merged taxonomy.
pub fn evaluate_payload(taxonomy: &Taxonomy) -> String {
    format!("Taxonomy to evaluate:\n{}", taxonomy.render_outline())
}

/// Render the classification payload: the taxonomy plus one document.
pub fn classify_payload(taxonomy: &Taxonomy, work_id: &str, title: &str, body: &str) -> String {
    format!(
        "Taxonomy:\n{}\nDocument id: {work_id}\nTitle: {title}\nAbstract: {body}",
        taxonomy.render_outline()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Category;

    #[test]
    fn merge_payload_labels_batches_one_based() {
        let batches = vec![
            Taxonomy::new(vec![Category::new("A", "first")]),
            Taxonomy::new(vec![Category::new("B", "second")]),
        ];
        let payload = merge_payload(&batches);
        assert!(payload.contains("Taxonomy 1:\n- A: first"));
        assert!(payload.contains("Taxonomy 2:\n- B: second"));
    }

    #[test]
    fn classify_payload_carries_document_fields() {
        let taxonomy = Taxonomy::new(vec![Category::new("Systems", "")]);
        let payload = classify_payload(&taxonomy, "w1", "A Paper", "Some text.");
        assert!(payload.contains("Document id: w1"));
        assert!(payload.contains("Title: A Paper"));
        assert!(payload.contains("Abstract: Some text."));
        assert!(payload.contains("- Systems"));
    }
}
