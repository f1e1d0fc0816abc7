//! In-memory category tree assembly and reordering.
//!
//! Pure and synchronous: takes the flat category list the repository returns
//! and reconstructs parent/child nesting for rendering, or flattens a tree
//! back into the id sequence the reorder operation persists.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{Category, CategoryNode};

/// Build the category forest from a flat list.
///
/// Children are sorted by (display_order, name). A category whose parent is
/// not in the input is treated as a root rather than dropped. The relational
/// store is expected to prevent `parent_id` cycles; if one slips through
/// anyway, traversal stops and a structural error is reported instead of
/// recursing forever.
pub fn build_tree(categories: Vec<Category>) -> Result<Vec<CategoryNode>> {
    let ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    let total = categories.len();

    // Bucket by effective parent; unknown parents promote to root.
    let mut by_parent: HashMap<Option<i64>, Vec<Category>> = HashMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|p| ids.contains(p));
        by_parent.entry(parent).or_default().push(category);
    }
    for bucket in by_parent.values_mut() {
        bucket.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    let mut placed = 0usize;
    let roots = assemble(None, &mut by_parent, &mut placed);

    // Buckets left behind are reachable only through themselves.
    if placed < total {
        return Err(Error::InvalidInput(
            "category hierarchy contains a cycle".to_string(),
        ));
    }

    Ok(roots)
}

fn assemble(
    parent: Option<i64>,
    by_parent: &mut HashMap<Option<i64>, Vec<Category>>,
    placed: &mut usize,
) -> Vec<CategoryNode> {
    let mut nodes = Vec::new();
    if let Some(categories) = by_parent.remove(&parent) {
        for category in categories {
            *placed += 1;
            let children = assemble(Some(category.id), by_parent, placed);
            nodes.push(CategoryNode { category, children });
        }
    }
    nodes
}

/// Flatten a tree into the depth-first pre-order id sequence, suitable for
/// persisting through the category reorder operation.
pub fn flatten_order(nodes: &[CategoryNode]) -> Vec<i64> {
    let mut ids = Vec::new();
    collect_ids(nodes, &mut ids);
    ids
}

fn collect_ids(nodes: &[CategoryNode], ids: &mut Vec<i64>) {
    for node in nodes {
        ids.push(node.category.id);
        collect_ids(&node.children, ids);
    }
}
