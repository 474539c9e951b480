//! Batch planning: split the corpus into fixed-size chunks and render each
//! chunk into one prompt payload.

use crate::work::Work;

/// Partition `works` into consecutive chunks of at most `batch_size` documents
/// and render one payload per chunk. Input order is preserved and the final
/// chunk may be shorter. An empty corpus yields zero payloads.
pub fn plan_batches(works: &[Work], batch_size: usize, body_field: &str) -> Vec<String> {
    // batch_size is validated upstream; clamp so chunks() cannot panic on 0
    let batch_size = batch_size.max(1);
    works
        .chunks(batch_size)
        .map(|chunk| {
            chunk
                .iter()
                .map(|work| render_block(work, body_field))
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .collect()
}

/// Render one document as a two-line block, with empty strings for missing
/// fields.
fn render_block(work: &Work, body_field: &str) -> String {
    format!(
        "Title: {}\nAbstract: {}",
        work.title_or_empty(),
        work.field_text(body_field)
    )
}
