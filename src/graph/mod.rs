//! The assembled taxonomy graph: category and document nodes with directed
//! edges, backed by `petgraph`.
//!
//! Category nodes are keyed by display name, so two categories sharing a name
//! anywhere in the tree collapse into one node. Document nodes are keyed by a
//! `workid#ordinal` composite so duplicate work ids stay distinct. Rendering
//! consumers compute their own layout (e.g. from the nested block state); the
//! graph carries no coordinates.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::taxonomy::{Category, Taxonomy};
use crate::work::WorkClassification;

/// Node kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Category,
    Document,
}

/// Attributes of one graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Node key: the category name, or `workid#ordinal` for documents.
    pub id: String,
    /// Display name: category name or document title.
    pub name: String,
    /// Category description, or the classifier's rationale for documents.
    pub description: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Source work id; documents only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

/// Edge kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Parent category to direct child category.
    Subcategory,
    /// Document to one of its assigned categories.
    AssignedTo,
}

/// Directed graph linking categories to each other and to the documents
/// assigned to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyGraph {
    graph: DiGraph<NodeData, EdgeKind>,
}

impl TaxonomyGraph {
    /// Assemble the graph from a (typically pruned) taxonomy and the
    /// classification list.
    ///
    /// Phase 1 walks the tree pre-order, adding one category node per name
    /// and one `Subcategory` edge per parent-child pair. Phase 2 adds one
    /// document node per classification plus an `AssignedTo` edge for every
    /// assigned name that resolves to a category node; names that do not
    /// resolve are skipped.
    pub fn assemble(taxonomy: &Taxonomy, classifications: &[WorkClassification]) -> Self {
        let mut graph: DiGraph<NodeData, EdgeKind> = DiGraph::new();
        let mut categories: HashMap<String, NodeIndex> = HashMap::new();

        fn add_category(
            category: &Category,
            parent: Option<NodeIndex>,
            graph: &mut DiGraph<NodeData, EdgeKind>,
            categories: &mut HashMap<String, NodeIndex>,
        ) {
            let idx = *categories
                .entry(category.name.clone())
                .or_insert_with(|| {
                    graph.add_node(NodeData {
                        id: category.name.clone(),
                        name: category.name.clone(),
                        description: category.description.clone(),
                        kind: NodeKind::Category,
                        document_id: None,
                    })
                });
            if let Some(parent) = parent {
                graph.add_edge(parent, idx, EdgeKind::Subcategory);
            }
            for sub in &category.subcategories {
                add_category(sub, Some(idx), graph, categories);
            }
        }

        for category in &taxonomy.category_list {
            add_category(category, None, &mut graph, &mut categories);
        }

        for (ordinal, classification) in classifications.iter().enumerate() {
            let doc = graph.add_node(NodeData {
                id: format!("{}#{ordinal}", classification.work_id),
                name: classification.title.clone(),
                description: classification.rationale.clone(),
                kind: NodeKind::Document,
                document_id: Some(classification.work_id.clone()),
            });
            for name in &classification.categories {
                // Names invented by the classifier or pruned away are skipped.
                if let Some(&category) = categories.get(name) {
                    graph.add_edge(doc, category, EdgeKind::AssignedTo);
                }
            }
        }

        Self { graph }
    }

    /// Total node count.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total edge count.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of category nodes.
    pub fn category_count(&self) -> usize {
        self.nodes().filter(|n| n.kind == NodeKind::Category).count()
    }

    /// Number of document nodes.
    pub fn document_count(&self) -> usize {
        self.nodes().filter(|n| n.kind == NodeKind::Document).count()
    }

    /// Iterate over all node attributes.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.graph.node_weights()
    }

    /// Look up a node by its key.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.nodes().find(|n| n.id == id)
    }

    /// Whether a directed edge of the given kind exists between two node keys.
    pub fn has_edge(&self, from: &str, to: &str, kind: EdgeKind) -> bool {
        let Some(from_idx) = self.index_of(from) else {
            return false;
        };
        self.graph
            .edges_directed(from_idx, Direction::Outgoing)
            .any(|e| *e.weight() == kind && self.graph[e.target()].id == to)
    }

    /// Out-degree of the node with the given key; `None` for unknown keys.
    pub fn out_degree(&self, id: &str) -> Option<usize> {
        let idx = self.index_of(id)?;
        Some(
            self.graph
                .edges_directed(idx, Direction::Outgoing)
                .count(),
        )
    }

    fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].id == id)
    }
}
