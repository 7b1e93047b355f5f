//! Persisted sync snapshot: node id → last generated fingerprint and outputs.
//!
//! On disk the snapshot is `.aiwork/figma-sync.json`:
//!
//! ```text
//! {
//!   "lastSync": "2026-01-01T00:00:00Z",
//!   "nodes": {
//!     "1:1": { "name": "Card", "hash": "…", "generatedFile": "Card.tsx", "assets": [] }
//!   }
//! }
//! ```

use crate::tree::{fingerprint_tree, walk, NodeRecord};
use crate::types::{Fingerprint, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One tracked node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEntry {
    pub name: String,
    #[serde(rename = "hash")]
    pub fingerprint: Fingerprint,
    pub generated_file: String,
    #[serde(default, rename = "assets")]
    pub asset_paths: Vec<String>,
}

impl SyncEntry {
    pub fn new(
        name: impl Into<String>,
        fingerprint: impl Into<Fingerprint>,
        generated_file: impl Into<String>,
    ) -> Self {
        SyncEntry {
            name: name.into(),
            fingerprint: fingerprint.into(),
            generated_file: generated_file.into(),
            asset_paths: Vec::new(),
        }
    }

    pub fn with_assets(mut self, asset_paths: Vec<String>) -> Self {
        self.asset_paths = asset_paths;
        self
    }
}

/// Last-known-good state of generated code for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    #[serde(default, rename = "lastSync", skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default, rename = "nodes")]
    pub entries: BTreeMap<NodeId, SyncEntry>,
}

impl SyncSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, node_id: &str) -> Option<&SyncEntry> {
        self.entries.get(node_id)
    }

    /// Insert or replace the entry for `node_id`, leaving other entries untouched.
    pub fn upsert(&mut self, node_id: impl Into<NodeId>, entry: SyncEntry) {
        self.entries.insert(node_id.into(), entry);
    }

    /// Build a snapshot tracking every node of `tree`, each mapped to `generated_file`.
    ///
    /// Mostly useful for seeding state and for tests of the no-op case.
    pub fn from_tree(tree: &NodeRecord, generated_file: &str, synced_at: DateTime<Utc>) -> Self {
        let fingerprints = fingerprint_tree(tree);
        let entries = walk::flatten(tree)
            .into_iter()
            .filter_map(|(id, node)| {
                let fp = fingerprints.get(id)?;
                Some((
                    id.to_string(),
                    SyncEntry::new(node.name.clone(), fp.clone(), generated_file),
                ))
            })
            .collect();
        SyncSnapshot {
            last_sync: Some(synced_at),
            entries,
        }
    }
}
