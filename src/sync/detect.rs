//! Change detection
//!
//! Compares the last sync snapshot with a freshly extracted tree and classifies
//! each node as added, modified or deleted. Identity is the node id alone: a node
//! moved to another parent shows up as modified (its ancestors' fingerprints roll up),
//! never as a separate move.

use crate::sync::snapshot::SyncSnapshot;
use crate::tree::{fingerprint_tree, walk, NodeRecord};
use crate::types::{Fingerprint, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Change classification for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Deleted,
    Modified,
    Added,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

/// One detected change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub node_id: NodeId,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_fingerprint: Option<Fingerprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_fingerprint: Option<Fingerprint>,
    pub affected_files: Vec<String>,
}

/// Detect changes between `previous` and the `current` tree.
///
/// Records are emitted as deletions, then modifications (both in snapshot id order),
/// then additions (in pre-order of `current`).
pub fn detect_changes(previous: &SyncSnapshot, current: &NodeRecord) -> Vec<ChangeRecord> {
    let flattened = walk::flatten(current);
    let fingerprints = fingerprint_tree(current);
    let current_ids: HashSet<&str> = flattened.iter().map(|(id, _)| *id).collect();

    let mut deleted = Vec::new();
    let mut modified = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for (node_id, entry) in &previous.entries {
        if !current_ids.contains(node_id.as_str()) {
            let mut affected_files = vec![entry.generated_file.clone()];
            affected_files.extend(entry.asset_paths.iter().cloned());
            deleted.push(ChangeRecord {
                node_id: node_id.clone(),
                change_type: ChangeType::Deleted,
                old_fingerprint: Some(entry.fingerprint.clone()),
                new_fingerprint: None,
                affected_files,
            });
            continue;
        }

        visited.insert(node_id.as_str());
        let Some(new_fingerprint) = fingerprints.get(node_id.as_str()) else {
            continue;
        };
        if *new_fingerprint != entry.fingerprint {
            modified.push(ChangeRecord {
                node_id: node_id.clone(),
                change_type: ChangeType::Modified,
                old_fingerprint: Some(entry.fingerprint.clone()),
                new_fingerprint: Some(new_fingerprint.clone()),
                affected_files: vec![entry.generated_file.clone()],
            });
        }
    }

    let added = flattened
        .iter()
        .filter(|(id, _)| !visited.contains(id))
        .map(|(id, _)| ChangeRecord {
            node_id: id.to_string(),
            change_type: ChangeType::Added,
            old_fingerprint: None,
            new_fingerprint: fingerprints.get(*id).cloned(),
            affected_files: Vec::new(),
        });

    tracing::debug!(
        deleted = deleted.len(),
        modified = modified.len(),
        tracked = previous.entries.len(),
        current = flattened.len(),
        "Change detection complete"
    );

    deleted.into_iter().chain(modified).chain(added).collect()
}

/// Detection result plus the derived summary handed to the tool layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    pub changes: Vec<ChangeRecord>,
    pub total_changes: usize,
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    /// De-duplicated union of every record's affected files, sorted.
    pub affected_files: Vec<String>,
}

impl ChangeReport {
    pub fn from_changes(changes: Vec<ChangeRecord>) -> Self {
        let count = |kind: ChangeType| changes.iter().filter(|c| c.change_type == kind).count();
        let affected_files: BTreeSet<String> = changes
            .iter()
            .flat_map(|c| c.affected_files.iter().cloned())
            .collect();
        ChangeReport {
            total_changes: changes.len(),
            added: count(ChangeType::Added),
            modified: count(ChangeType::Modified),
            deleted: count(ChangeType::Deleted),
            affected_files: affected_files.into_iter().collect(),
            changes,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes > 0
    }
}

/// Run detection and summarise the result.
pub fn check(previous: &SyncSnapshot, current: &NodeRecord) -> ChangeReport {
    ChangeReport::from_changes(detect_changes(previous, current))
}
