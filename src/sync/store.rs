//! Sync record store
//!
//! Owns the persisted `SyncSnapshot` for one project. Reads degrade to an empty
//! snapshot when the file is missing or corrupt; writes are atomic and serialized
//! per file path, and failures are returned to the caller.

use crate::concurrency::PathLockManager;
use crate::error::StorageError;
use crate::persist;
use crate::sync::snapshot::{SyncEntry, SyncSnapshot};
use crate::workspace::WorkspacePaths;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Source of "now" for stamping `lastSync`.
pub type ClockFn = fn() -> DateTime<Utc>;

/// Summary of what the snapshot currently tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub sync_file: PathBuf,
    pub last_sync: Option<DateTime<Utc>>,
    pub tracked_nodes: usize,
    pub nodes: Vec<TrackedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedNode {
    pub node_id: String,
    pub name: String,
    pub generated_file: String,
    pub asset_count: usize,
}

/// Persistent store of the last sync snapshot for a single project root.
pub struct SyncRecordStore {
    path: PathBuf,
    locks: Arc<PathLockManager>,
    clock: ClockFn,
}

impl SyncRecordStore {
    /// Open the store for a project workspace.
    pub fn new(paths: &WorkspacePaths, locks: Arc<PathLockManager>) -> Self {
        Self::at_path(paths.sync_file(), locks)
    }

    /// Open the store backed by an explicit snapshot file.
    pub fn at_path(path: PathBuf, locks: Arc<PathLockManager>) -> Self {
        Self {
            path,
            locks,
            clock: Utc::now,
        }
    }

    /// Replace the clock used to stamp `lastSync`.
    pub fn with_clock(mut self, clock: ClockFn) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot; a missing or unparsable file yields an empty snapshot.
    pub fn load(&self) -> SyncSnapshot {
        let snapshot = persist::read_json_lenient::<SyncSnapshot>(&self.path).unwrap_or_default();
        debug!(
            path = %self.path.display(),
            entries = snapshot.entries.len(),
            "Loaded sync snapshot"
        );
        snapshot
    }

    pub fn status(&self) -> SyncStatus {
        let snapshot = self.load();
        SyncStatus {
            sync_file: self.path.clone(),
            last_sync: snapshot.last_sync,
            tracked_nodes: snapshot.entries.len(),
            nodes: snapshot
                .entries
                .into_iter()
                .map(|(node_id, entry)| TrackedNode {
                    node_id,
                    name: entry.name,
                    generated_file: entry.generated_file,
                    asset_count: entry.asset_paths.len(),
                })
                .collect(),
        }
    }

    /// Upsert the entry for `node_id`, stamp `lastSync`, and persist atomically.
    ///
    /// Entries for other nodes are preserved. Returns the snapshot as written.
    pub fn record_generation(
        &self,
        node_id: &str,
        entry: SyncEntry,
    ) -> Result<SyncSnapshot, StorageError> {
        let lock = self.locks.get_lock(&self.path);
        let _guard = lock.lock();

        let mut snapshot = self.load();
        snapshot.upsert(node_id, entry);
        snapshot.last_sync = Some((self.clock)());

        persist::write_json_atomic(&self.path, &snapshot)?;
        info!(
            node_id,
            path = %self.path.display(),
            tracked = snapshot.entries.len(),
            "Recorded generation"
        );
        Ok(snapshot)
    }
}
