//! Copy-on-write pruning of categories with no assigned documents.
//!
//! Pruning rebuilds the tree post-order: children are pruned first, then a
//! category survives if its own name was used by some classification or if at
//! least one child survived. The input tree is never mutated.

use std::collections::HashSet;

use crate::work::WorkClassification;

use super::{Category, Taxonomy};

/// Remove categories that received no document assignments.
///
/// Defensive no-op shortcuts: with no classifications, with an empty used-name
/// set, or when pruning would remove every top-level category, the input
/// taxonomy is returned unchanged so an unlucky classification pass never
/// yields an empty result.
pub fn prune_unused(taxonomy: &Taxonomy, classifications: &[WorkClassification]) -> Taxonomy {
    if classifications.is_empty() {
        return taxonomy.clone();
    }

    let used: HashSet<&str> = classifications
        .iter()
        .flat_map(|c| c.categories.iter().map(String::as_str))
        .collect();
    if used.is_empty() {
        return taxonomy.clone();
    }

    let survivors: Vec<Category> = taxonomy
        .category_list
        .iter()
        .filter_map(|category| prune_category(category, &used))
        .collect();

    if survivors.is_empty() {
        return taxonomy.clone();
    }
    Taxonomy::new(survivors)
}

/// Post-order rebuild of one subtree; `None` when the whole subtree is pruned.
fn prune_category(category: &Category, used: &HashSet<&str>) -> Option<Category> {
    let kept: Vec<Category> = category
        .subcategories
        .iter()
        .filter_map(|sub| prune_category(sub, used))
        .collect();

    if used.contains(category.name.as_str()) || !kept.is_empty() {
        Some(Category {
            name: category.name.clone(),
            description: category.description.clone(),
            subcategories: kept,
        })
    } else {
        None
    }
}
