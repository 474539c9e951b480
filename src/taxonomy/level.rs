//! Leveled block decomposition of a taxonomy ("nested block state").
//!
//! Converts an arbitrary-depth tree into an explicit list of discrete levels
//! for layout and rendering consumers: level 0 holds the top-level categories,
//! each deeper level the next nesting depth, plus one final level with one
//! attachment block per leaf category, where documents hang. The result is a
//! snapshot; it goes stale if the source tree changes and must be recomputed.

use serde::{Deserialize, Serialize};

use super::{Category, Taxonomy};

/// Marker appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Label of the single block an empty taxonomy produces.
pub const EMPTY_PLACEHOLDER: &str = "(empty taxonomy)";

/// One level of the decomposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelBlocks {
    /// Depth of this level: 0 for top-level categories, increasing downward.
    pub depth: usize,
    /// Per-node display labels, in pre-order sibling order: (node id, label).
    pub vertex_text: Vec<(String, String)>,
    /// Number of blocks on this level with a non-empty label.
    pub non_empty_blocks: usize,
}

impl LevelBlocks {
    /// Look up the display label for a node id on this level.
    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.vertex_text
            .iter()
            .find(|(node, _)| node == id)
            .map(|(_, label)| label.as_str())
    }

    fn push(&mut self, id: String, label: String) {
        if !label.is_empty() {
            self.non_empty_blocks += 1;
        }
        self.vertex_text.push((id, label));
    }
}

/// Read-only leveled view of a taxonomy snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBlockState {
    /// Levels from the top of the tree down, ending with the document level.
    pub levels: Vec<LevelBlocks>,
    /// Maximum rendered label length used when the view was computed.
    pub max_label_chars: usize,
}

impl NestedBlockState {
    /// Number of levels, always at least 1.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The deepest level (the document attachment level for non-empty trees).
    pub fn deepest(&self) -> &LevelBlocks {
        // levels is never empty: an empty taxonomy still yields one level
        &self.levels[self.levels.len() - 1]
    }
}

/// Truncate a label to `max_chars` characters, appending [`ELLIPSIS`] when
/// truncation occurs. The rendered length never exceeds `max_chars`.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let prefix: String = name.chars().take(keep).collect();
    let mut label = prefix;
    label.push_str(ELLIPSIS);
    label
}

impl Taxonomy {
    /// Compute the leveled block decomposition of this taxonomy.
    ///
    /// A tree whose deepest chain has length `k` yields exactly `k + 1`
    /// levels: one per category depth plus the document level. An empty
    /// taxonomy yields exactly one level holding the placeholder block.
    pub fn to_nested_block_state(&self, max_label_chars: usize) -> NestedBlockState {
        let depth = self.max_depth();
        if depth == 0 {
            let mut level = LevelBlocks::default();
            level.push(
                "taxonomy".to_string(),
                truncate_label(EMPTY_PLACEHOLDER, max_label_chars),
            );
            return NestedBlockState {
                levels: vec![level],
                max_label_chars,
            };
        }

        let mut levels: Vec<LevelBlocks> = (0..=depth)
            .map(|d| LevelBlocks {
                depth: d,
                ..Default::default()
            })
            .collect();

        fn visit(
            category: &Category,
            depth: usize,
            doc_level: usize,
            max_label_chars: usize,
            levels: &mut [LevelBlocks],
        ) {
            levels[depth].push(
                category.name.clone(),
                truncate_label(&category.name, max_label_chars),
            );
            if category.is_leaf() {
                // One attachment block per leaf on the document level.
                levels[doc_level].push(
                    category.name.clone(),
                    truncate_label(&category.name, max_label_chars),
                );
            }
            for sub in &category.subcategories {
                visit(sub, depth + 1, doc_level, max_label_chars, levels);
            }
        }

        for category in &self.category_list {
            visit(category, 0, depth, max_label_chars, &mut levels);
        }

        NestedBlockState {
            levels,
            max_label_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&str]) -> Taxonomy {
        let mut node: Option<Category> = None;
        for name in names.iter().rev() {
            let mut category = Category::new(*name, "");
            if let Some(child) = node.take() {
                category.subcategories.push(child);
            }
            node = Some(category);
        }
        Taxonomy::new(node.into_iter().collect())
    }

    #[test]
    fn depth_law_levels_is_chain_length_plus_one() {
        assert_eq!(chain(&["A"]).to_nested_block_state(25).level_count(), 2);
        assert_eq!(
            chain(&["A", "B", "C"]).to_nested_block_state(25).level_count(),
            4
        );
    }

    #[test]
    fn empty_taxonomy_yields_one_placeholder_level() {
        let state = Taxonomy::default().to_nested_block_state(25);
        assert_eq!(state.level_count(), 1);
        assert_eq!(state.levels[0].non_empty_blocks, 1);
        assert_eq!(
            state.levels[0].label_for("taxonomy"),
            Some(EMPTY_PLACEHOLDER)
        );
    }

    #[test]
    fn adding_depth_adds_exactly_one_level_each() {
        let one = chain(&["A"]).to_nested_block_state(25).level_count();
        let three = chain(&["A", "B", "C"]).to_nested_block_state(25).level_count();
        assert_eq!(three - one, 2);
    }

    #[test]
    fn single_leaf_has_one_block_on_deepest_level() {
        let state = chain(&["A", "B"]).to_nested_block_state(25);
        assert_eq!(state.deepest().non_empty_blocks, 1);
    }

    #[test]
    fn labels_truncate_to_max_chars_with_ellipsis() {
        let long = "An Extremely Long Category Name About Systems";
        let label = truncate_label(long, 25);
        assert!(label.chars().count() <= 25);
        assert!(label.ends_with(ELLIPSIS));
        let prefix: String = long.chars().take(22).collect();
        assert_eq!(&label[..label.len() - ELLIPSIS.len()], prefix);
    }

    #[test]
    fn short_labels_are_untruncated() {
        assert_eq!(truncate_label("Systems", 25), "Systems");
    }

    #[test]
    fn vertex_text_maps_names_to_labels_per_level() {
        let taxonomy = Taxonomy::new(vec![
            Category::new("Systems", "").with_subcategories(vec![
                Category::new("Distributed", ""),
                Category::new("Storage", ""),
            ]),
        ]);
        let state = taxonomy.to_nested_block_state(25);
        assert_eq!(state.level_count(), 3);
        assert_eq!(state.levels[0].label_for("Systems"), Some("Systems"));
        assert_eq!(state.levels[1].label_for("Distributed"), Some("Distributed"));
        assert_eq!(state.levels[1].non_empty_blocks, 2);
        // Both leaves contribute a document attachment block.
        assert_eq!(state.deepest().non_empty_blocks, 2);
    }

    #[test]
    fn sibling_order_is_preserved_within_levels() {
        let taxonomy = Taxonomy::new(vec![
            Category::new("B", ""),
            Category::new("A", ""),
            Category::new("C", ""),
        ]);
        let state = taxonomy.to_nested_block_state(25);
        let ids: Vec<&str> = state.levels[0]
            .vertex_text
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }
}
