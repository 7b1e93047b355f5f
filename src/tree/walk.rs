//! Tree traversal helpers.

use crate::tree::node::NodeRecord;
use serde::Serialize;

/// Flatten a tree into `(id, node)` pairs in pre-order (parent before children).
///
/// Ids are assumed unique within one tree; duplicates are not detected.
pub fn flatten(root: &NodeRecord) -> Vec<(&str, &NodeRecord)> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push((node.id.as_str(), node));
        // Reverse so the first child is visited next.
        stack.extend(node.children.iter().rev());
    }
    out
}

/// Count nodes in a tree, root included.
pub fn count_nodes(root: &NodeRecord) -> usize {
    1 + root.children.iter().map(count_nodes).sum::<usize>()
}

/// A designer note attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSummary {
    pub node_id: String,
    pub node_name: String,
    pub node_type: String,
    pub annotation: String,
}

/// Collect all non-empty annotations in pre-order.
pub fn collect_annotations(root: &NodeRecord) -> Vec<AnnotationSummary> {
    flatten(root)
        .into_iter()
        .filter_map(|(_, node)| {
            let annotation = node.annotation.as_deref()?.trim();
            if annotation.is_empty() {
                return None;
            }
            Some(AnnotationSummary {
                node_id: node.id.clone(),
                node_name: node.name.clone(),
                node_type: node.node_type.clone(),
                annotation: annotation.to_string(),
            })
        })
        .collect()
}
