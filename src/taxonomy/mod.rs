//! Taxonomy trees: named, described categories in a rooted ordered forest.
//!
//! [`Category`] is one node (name, description, ordered subcategories);
//! [`Taxonomy`] is the ordered list of top-level categories. Trees are built
//! top-down from model output and never link back to an ancestor, so they are
//! acyclic by construction. Merging and pruning always construct new trees
//! rather than mutating in place.

pub mod level;
pub mod prune;

use serde::{Deserialize, Serialize};

/// One taxonomy node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category name. Non-empty; unique within a sibling list by convention.
    pub name: String,
    /// Short description of what the category covers.
    #[serde(default)]
    pub description: String,
    /// Ordered child categories; empty for leaves.
    #[serde(default)]
    pub subcategories: Vec<Category>,
}

impl Category {
    /// Create a leaf category.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            subcategories: Vec::new(),
        }
    }

    /// Attach subcategories, replacing any existing ones.
    pub fn with_subcategories(mut self, subcategories: Vec<Category>) -> Self {
        self.subcategories = subcategories;
        self
    }

    /// Whether this category has no children.
    pub fn is_leaf(&self) -> bool {
        self.subcategories.is_empty()
    }

    /// Depth of the subtree rooted here; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .subcategories
            .iter()
            .map(Category::depth)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in the subtree rooted here, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .subcategories
            .iter()
            .map(Category::node_count)
            .sum::<usize>()
    }
}

/// A taxonomy: the ordered list of top-level categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Top-level categories, in model output order.
    #[serde(default)]
    pub category_list: Vec<Category>,
}

impl Taxonomy {
    /// Create a taxonomy from top-level categories.
    pub fn new(category_list: Vec<Category>) -> Self {
        Self { category_list }
    }

    /// Whether the taxonomy has no categories at all.
    pub fn is_empty(&self) -> bool {
        self.category_list.is_empty()
    }

    /// Total number of categories across all subtrees.
    pub fn category_count(&self) -> usize {
        self.category_list.iter().map(Category::node_count).sum()
    }

    /// Length of the deepest root-to-leaf chain; 0 for an empty taxonomy,
    /// 1 for a taxonomy of only top-level leaves.
    pub fn max_depth(&self) -> usize {
        self.category_list
            .iter()
            .map(Category::depth)
            .max()
            .unwrap_or(0)
    }

    /// Names of all leaf categories, in pre-order.
    pub fn leaf_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        fn visit(category: &Category, names: &mut Vec<String>) {
            if category.is_leaf() {
                names.push(category.name.clone());
            }
            for sub in &category.subcategories {
                visit(sub, names);
            }
        }
        for category in &self.category_list {
            visit(category, &mut names);
        }
        names
    }

    /// Flatten the tree into ancestor-path strings, one per node.
    ///
    /// Pre-order: every parent's path precedes each of its children's paths,
    /// and sibling order is preserved. Each path joins ancestor names with
    /// `separator`.
    pub fn flatten_paths(&self, separator: &str) -> Vec<String> {
        let mut paths = Vec::new();
        fn visit(category: &Category, prefix: &str, separator: &str, paths: &mut Vec<String>) {
            let path = if prefix.is_empty() {
                category.name.clone()
            } else {
                format!("{prefix}{separator}{}", category.name)
            };
            paths.push(path.clone());
            for sub in &category.subcategories {
                visit(sub, &path, separator, paths);
            }
        }
        for category in &self.category_list {
            visit(category, "", separator, &mut paths);
        }
        paths
    }

    /// Render the taxonomy as an indented outline for model prompts.
    ///
    /// One line per category: `- Name: description`, indented two spaces per
    /// nesting level.
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        fn visit(category: &Category, indent: usize, out: &mut String) {
            for _ in 0..indent {
                out.push_str("  ");
            }
            out.push_str("- ");
            out.push_str(&category.name);
            if !category.description.is_empty() {
                out.push_str(": ");
                out.push_str(&category.description);
            }
            out.push('\n');
            for sub in &category.subcategories {
                visit(sub, indent + 1, out);
            }
        }
        for category in &self.category_list {
            visit(category, 0, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Taxonomy {
        Taxonomy::new(vec![
            Category::new("Systems", "Computer systems").with_subcategories(vec![
                Category::new("Distributed", "Distributed systems").with_subcategories(vec![
                    Category::new("Scheduling", "Task scheduling"),
                ]),
                Category::new("Storage", "Storage systems"),
            ]),
            Category::new("Theory", "Theoretical CS"),
        ])
    }

    #[test]
    fn flatten_is_preorder_parent_before_child() {
        let paths = sample().flatten_paths(" > ");
        assert_eq!(
            paths,
            vec![
                "Systems",
                "Systems > Distributed",
                "Systems > Distributed > Scheduling",
                "Systems > Storage",
                "Theory",
            ]
        );
        // Every node appears exactly once, and each parent path precedes
        // each of its children's paths.
        for (i, path) in paths.iter().enumerate() {
            if let Some(pos) = path.rfind(" > ") {
                let parent = &path[..pos];
                let parent_idx = paths.iter().position(|p| p == parent).unwrap();
                assert!(parent_idx < i, "parent {parent} must precede {path}");
            }
        }
    }

    #[test]
    fn depth_counts_longest_chain() {
        assert_eq!(sample().max_depth(), 3);
        assert_eq!(Taxonomy::default().max_depth(), 0);
        assert_eq!(Taxonomy::new(vec![Category::new("A", "")]).max_depth(), 1);
    }

    #[test]
    fn category_count_totals_all_nodes() {
        assert_eq!(sample().category_count(), 5);
    }

    #[test]
    fn leaf_names_in_preorder() {
        assert_eq!(sample().leaf_names(), vec!["Scheduling", "Storage", "Theory"]);
    }

    #[test]
    fn outline_indents_by_nesting_level() {
        let outline = sample().render_outline();
        assert!(outline.contains("- Systems: Computer systems\n"));
        assert!(outline.contains("  - Distributed: Distributed systems\n"));
        assert!(outline.contains("    - Scheduling: Task scheduling\n"));
    }

    #[test]
    fn taxonomy_roundtrips_through_json() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: Taxonomy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn taxonomy_accepts_minimal_json() {
        // Model output may omit description/subcategories on leaves.
        let json = r#"{"category_list": [{"name": "Only"}]}"#;
        let parsed: Taxonomy = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.category_list[0].name, "Only");
        assert!(parsed.category_list[0].is_leaf());
    }
}
