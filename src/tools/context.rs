//! Shared state handed to every tool handler.

use crate::concurrency::PathLockManager;
use crate::config::AiworkConfig;
use crate::error::ApiError;
use crate::selection::SelectionStore;
use crate::sync::SyncRecordStore;
use crate::workspace::{Defaults, Workspace, WorkspacePaths};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Live count of plugin connections, shared with the bridge.
pub type ConnectionCounter = Arc<AtomicUsize>;

/// Explicit per-server state: project root, configuration and stores.
///
/// Stores for other project roots (via a tool's `projectRoot` argument) are opened on
/// demand and share the same lock manager.
pub struct ToolContext {
    project_root: PathBuf,
    config: AiworkConfig,
    locks: Arc<PathLockManager>,
    selection: SelectionStore,
    connections: ConnectionCounter,
}

impl ToolContext {
    pub fn new(project_root: PathBuf, config: AiworkConfig) -> Self {
        Self::with_locks(project_root, config, Arc::new(PathLockManager::new()))
    }

    pub fn with_locks(
        project_root: PathBuf,
        config: AiworkConfig,
        locks: Arc<PathLockManager>,
    ) -> Self {
        let data_dir = config.storage.resolve_data_dir(&project_root);
        let selection = SelectionStore::new(&data_dir, config.storage.history_limit, locks.clone());
        Self {
            project_root,
            config,
            locks,
            selection,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Share the bridge's connection counter.
    pub fn with_connections(mut self, connections: ConnectionCounter) -> Self {
        self.connections = connections;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &AiworkConfig {
        &self.config
    }

    pub fn locks(&self) -> Arc<PathLockManager> {
        self.locks.clone()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn connections(&self) -> ConnectionCounter {
        self.connections.clone()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Project root for a call: `projectRoot` when given (relative to the server root),
    /// else the server root.
    pub fn resolve_root(&self, project_root: Option<&str>) -> PathBuf {
        match project_root.filter(|r| !r.is_empty()) {
            Some(root) => self.resolve_path(&self.project_root, root),
            None => self.project_root.clone(),
        }
    }

    /// Resolve `path` against `base` unless it is already absolute.
    pub fn resolve_path(&self, base: &Path, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }

    pub fn workspace(&self, root: &Path) -> Workspace {
        Workspace::open(root, Defaults::from_dir(self.config.defaults_dir.as_deref()))
    }

    pub fn sync_store(&self, root: &Path) -> SyncRecordStore {
        SyncRecordStore::new(&WorkspacePaths::new(root), self.locks.clone())
    }
}

/// Deserialize tool arguments; `null` is treated as an empty object.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ApiError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ApiError::InvalidArguments(e.to_string()))
}
