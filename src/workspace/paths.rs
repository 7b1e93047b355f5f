//! Fixed layout of the `.aiwork/` project workspace.

use std::path::{Path, PathBuf};

pub const WORKSPACE_DIR: &str = ".aiwork";
pub const CONFIG_FILE: &str = "config.json";
pub const FIGMA_RULES_FILE: &str = "figma-rules.md";
pub const TECH_RULES_FILE: &str = "tech-design-rules.md";
pub const SYNC_FILE: &str = "figma-sync.json";
/// Optional server configuration layered by the config loader.
pub const SERVER_CONFIG_FILE: &str = "server.toml";

/// Resolved paths for one project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    project_root: PathBuf,
    workspace: PathBuf,
}

impl WorkspacePaths {
    /// Build paths for `project_root`, canonicalized when it exists.
    pub fn new(project_root: &Path) -> Self {
        let project_root =
            dunce::canonicalize(project_root).unwrap_or_else(|_| project_root.to_path_buf());
        let workspace = project_root.join(WORKSPACE_DIR);
        Self {
            project_root,
            workspace,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace
    }

    pub fn config_file(&self) -> PathBuf {
        self.workspace.join(CONFIG_FILE)
    }

    pub fn figma_rules_file(&self) -> PathBuf {
        self.workspace.join(FIGMA_RULES_FILE)
    }

    pub fn tech_rules_file(&self) -> PathBuf {
        self.workspace.join(TECH_RULES_FILE)
    }

    pub fn sync_file(&self) -> PathBuf {
        self.workspace.join(SYNC_FILE)
    }

    pub fn server_config_file(&self) -> PathBuf {
        self.workspace.join(SERVER_CONFIG_FILE)
    }

    /// Directory name of the project root, used as the default project name.
    pub fn project_dir_name(&self) -> String {
        self.project_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "project".to_string())
    }
}
