//! Selection store
//!
//! File-backed record of the most recent selection the design plugin pushed, plus a
//! bounded history. The file is the hand-off point between the bridge process that
//! receives selections and the assistant-facing process that reads them, so every
//! read goes back to disk.

use crate::asset::AssetExport;
use crate::concurrency::PathLockManager;
use crate::error::StorageError;
use crate::persist;
use crate::tree::NodeRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// File name of the selection store inside its data directory.
pub const SELECTION_FILE: &str = "selection.json";

/// Name of the default data directory under the system temp dir.
pub const DEFAULT_DATA_DIR_NAME: &str = "figma-mcp-data";

/// Default number of selections retained in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// `figma-selection` message body as sent by the plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionMessage {
    pub data: NodeRecord,
    #[serde(default)]
    pub assets: Vec<AssetExport>,
    pub timestamp: String,
}

/// A stored selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    pub data: NodeRecord,
    pub assets: Vec<AssetExport>,
    /// Timestamp reported by the plugin.
    pub timestamp: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSelections {
    #[serde(default)]
    current_selection: Option<SelectionRecord>,
    #[serde(default)]
    selection_history: Vec<SelectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStats {
    pub has_selection: bool,
    pub history_count: usize,
    pub last_update: Option<String>,
}

/// Default data directory shared by the bridge and the stdio server.
pub fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME)
}

pub struct SelectionStore {
    path: PathBuf,
    history_limit: usize,
    locks: Arc<PathLockManager>,
}

impl SelectionStore {
    pub fn new(data_dir: &Path, history_limit: usize, locks: Arc<PathLockManager>) -> Self {
        Self {
            path: data_dir.join(SELECTION_FILE),
            history_limit,
            locks,
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoredSelections {
        persist::read_json_lenient(&self.path).unwrap_or_default()
    }

    /// Store `message` as the current selection and push it onto the history.
    pub fn set_selection(&self, message: SelectionMessage) -> Result<SelectionRecord, StorageError> {
        let record = SelectionRecord {
            data: message.data,
            assets: message.assets,
            timestamp: message.timestamp,
            received_at: Utc::now(),
        };

        let lock = self.locks.get_lock(&self.path);
        let _guard = lock.lock();

        let mut stored = self.read();
        stored.current_selection = Some(record.clone());
        stored.selection_history.insert(0, record.clone());
        stored.selection_history.truncate(self.history_limit);
        persist::write_json_atomic(&self.path, &stored)?;

        info!(
            node_id = %record.data.id,
            name = %record.data.name,
            node_type = %record.data.node_type,
            assets = record.assets.len(),
            path = %self.path.display(),
            "Selection updated"
        );
        Ok(record)
    }

    pub fn current(&self) -> Option<SelectionRecord> {
        self.read().current_selection
    }

    /// Most recent first.
    pub fn history(&self) -> Vec<SelectionRecord> {
        self.read().selection_history
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let lock = self.locks.get_lock(&self.path);
        let _guard = lock.lock();
        persist::write_json_atomic(&self.path, &StoredSelections::default())
    }

    pub fn stats(&self) -> SelectionStats {
        let stored = self.read();
        SelectionStats {
            has_selection: stored.current_selection.is_some(),
            history_count: stored.selection_history.len(),
            last_update: stored.current_selection.map(|r| r.timestamp),
        }
    }
}
