//! StorageConfig: where shared selection data lives.

use crate::selection::{default_data_dir, DEFAULT_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selection data directory; relative paths resolve against the project root.
    /// Unset means `<temp_dir>/figma-mcp-data`, shared by every process on the machine.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Number of selections kept in history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl StorageConfig {
    /// Resolve the selection data directory for a project.
    pub fn resolve_data_dir(&self, project_root: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => project_root.join(dir),
            None => default_data_dir(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_limit: default_history_limit(),
        }
    }
}
