//! Workspace facade: init, config, file listing and documents under `.aiwork/`.

use crate::error::{ApiError, StorageError};
use crate::persist;
use crate::workspace::defaults::Defaults;
use crate::workspace::paths::{WorkspacePaths, CONFIG_FILE, FIGMA_RULES_FILE, TECH_RULES_FILE};
use crate::workspace::types::{
    DocKind, DocumentLookup, FileListing, FileSummary, InitReport, MarkdownFile, WorkspaceConfig,
    WorkspaceFile, WorkspaceFileType,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Framework assumed when neither the caller nor the workspace config names one.
pub const DEFAULT_FRAMEWORK: &str = "react-native";

/// One project's `.aiwork/` workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    paths: WorkspacePaths,
    defaults: Defaults,
}

impl Workspace {
    pub fn open(project_root: &Path, defaults: Defaults) -> Self {
        Self {
            paths: WorkspacePaths::new(project_root),
            defaults,
        }
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.config_file().is_file()
    }

    /// Read `config.json`; missing or unparsable yields `None`.
    pub fn read_config(&self) -> Option<WorkspaceConfig> {
        persist::read_json_lenient(&self.paths.config_file())
    }

    /// Framework to use: the requested one, else the configured one, else the default.
    pub fn resolve_framework(&self, requested: Option<&str>) -> String {
        requested
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .or_else(|| self.read_config().map(|c| c.framework))
            .unwrap_or_else(|| DEFAULT_FRAMEWORK.to_string())
    }

    /// Create the workspace layout, write a default config, and seed rule files.
    ///
    /// Existing rule files are never overwritten; `force` only permits replacing
    /// `config.json`.
    pub fn init(
        &self,
        framework: Option<&str>,
        project_name: Option<&str>,
        force: bool,
    ) -> Result<InitReport, ApiError> {
        let config_path = self.paths.config_file();
        if config_path.exists() && !force {
            return Err(ApiError::WorkspaceExists(config_path));
        }

        let workspace = self.paths.workspace_dir().to_path_buf();
        let mut directories = vec![workspace.clone()];
        directories.extend(DocKind::ALL.iter().map(|k| workspace.join(k.default_dir())));
        for dir in &directories {
            fs::create_dir_all(dir).map_err(|e| StorageError::at(dir, e))?;
        }

        let config = WorkspaceConfig::initial(
            project_name
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| self.paths.project_dir_name()),
            framework
                .filter(|f| !f.is_empty())
                .unwrap_or(DEFAULT_FRAMEWORK)
                .to_string(),
        );
        persist::write_json_atomic(&config_path, &config)?;

        let mut created_files = vec![config_path.clone()];
        let seeds = [
            (self.paths.figma_rules_file(), self.defaults.code_rules()),
            (self.paths.tech_rules_file(), self.defaults.tech_design_rules()),
        ];
        for (target, default) in seeds {
            if !target.exists() {
                if let Some(default) = default {
                    fs::write(&target, default.content)
                        .map_err(|e| StorageError::at(&target, e))?;
                }
            }
            if target.exists() {
                created_files.push(target);
            }
        }

        info!(
            workspace = %workspace.display(),
            project = %config.project_name,
            framework = %config.framework,
            "Workspace initialized"
        );
        Ok(InitReport {
            workspace_path: workspace,
            config_path,
            created_files,
            directories,
        })
    }

    /// Directory holding documents of `kind`.
    pub fn doc_dir(&self, kind: DocKind) -> PathBuf {
        let config = self.read_config();
        self.paths
            .workspace_dir()
            .join(kind.dir_name(config.as_ref()))
    }

    /// List config, rule files and documents. `filter` restricts the document kinds.
    pub fn list_files(&self, filter: Option<DocKind>) -> Result<FileListing, ApiError> {
        let workspace = self.paths.workspace_dir();
        if !workspace.is_dir() {
            return Err(ApiError::WorkspaceNotInitialized(workspace.to_path_buf()));
        }

        let mut files = Vec::new();
        let fixed = [
            (WorkspaceFileType::Config, CONFIG_FILE),
            (WorkspaceFileType::FigmaRules, FIGMA_RULES_FILE),
            (WorkspaceFileType::TechRules, TECH_RULES_FILE),
        ];
        for (file_type, name) in fixed {
            let path = workspace.join(name);
            if let Some(last_modified) = modified_iso(&path) {
                files.push(WorkspaceFile {
                    file_type,
                    path,
                    name: name.to_string(),
                    exists: true,
                    last_modified: Some(last_modified),
                });
            }
        }

        for kind in DocKind::ALL {
            if filter.is_some_and(|f| f != kind) {
                continue;
            }
            files.extend(
                list_markdown(&self.doc_dir(kind))
                    .into_iter()
                    .map(|md| WorkspaceFile {
                        file_type: kind.into(),
                        path: md.path,
                        name: md.name,
                        exists: true,
                        last_modified: Some(md.last_modified),
                    }),
            );
        }

        let mut by_type = BTreeMap::new();
        for file in &files {
            *by_type.entry(file.file_type.as_str().to_string()).or_insert(0) += 1;
        }
        debug!(total = files.len(), "Listed workspace files");

        Ok(FileListing {
            workspace_path: workspace.to_path_buf(),
            summary: FileSummary {
                total: files.len(),
                by_type,
            },
            files,
        })
    }

    /// Read a document; when absent, report which documents of that kind exist.
    pub fn read_document(&self, kind: DocKind, name: &str) -> Result<DocumentLookup, ApiError> {
        let file_name = markdown_file_name(name)?;
        let dir = self.doc_dir(kind);
        let path = dir.join(&file_name);

        if !path.is_file() {
            return Ok(DocumentLookup::Missing {
                file_name,
                available: list_markdown(&dir).into_iter().map(|f| f.name).collect(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| StorageError::at(&path, e))?;
        Ok(DocumentLookup::Found { path, content })
    }

    /// Write a document, creating its directory when needed.
    pub fn save_document(
        &self,
        kind: DocKind,
        name: &str,
        content: &str,
    ) -> Result<PathBuf, ApiError> {
        let file_name = markdown_file_name(name)?;
        let dir = self.doc_dir(kind);
        fs::create_dir_all(&dir).map_err(|e| StorageError::at(&dir, e))?;

        let path = dir.join(file_name);
        fs::write(&path, content).map_err(|e| StorageError::at(&path, e))?;
        info!(kind = %kind, path = %path.display(), "Document saved");
        Ok(path)
    }
}

/// Append `.md` when missing and reject names that would escape the document directory.
fn markdown_file_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed == "."
        || trimmed == ".."
    {
        return Err(ApiError::InvalidArguments(format!(
            "Invalid document name: {:?}",
            name
        )));
    }
    if trimmed.ends_with(".md") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}.md", trimmed))
    }
}

/// Strip a trailing `.md` for display.
pub fn document_stem(name: &str) -> &str {
    name.strip_suffix(".md").unwrap_or(name)
}

fn modified_iso(path: &Path) -> Option<String> {
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified = metadata.modified().ok()?;
    Some(DateTime::<Utc>::from(modified).to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Markdown files directly inside `dir`, sorted by name; a missing dir is empty.
pub fn list_markdown(dir: &Path) -> Vec<MarkdownFile> {
    let mut files: Vec<MarkdownFile> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            if !name.ends_with(".md") {
                return None;
            }
            let last_modified = modified_iso(e.path())?;
            Some(MarkdownFile {
                name,
                path: e.path().to_path_buf(),
                last_modified,
            })
        })
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace(temp: &TempDir) -> Workspace {
        Workspace::open(temp.path(), Defaults::Embedded)
    }

    #[test]
    fn test_init_creates_layout() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);

        let report = ws.init(Some("react"), Some("shop"), false).unwrap();
        assert_eq!(report.directories.len(), 5);
        assert!(ws.paths().figma_rules_file().is_file());
        assert!(ws.paths().tech_rules_file().is_file());
        assert_eq!(report.created_files.len(), 3);

        let config = ws.read_config().unwrap();
        assert_eq!(config.project_name, "shop");
        assert_eq!(config.framework, "react");
        assert!(ws.is_initialized());
    }

    #[test]
    fn test_init_refuses_without_force() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        ws.init(None, None, false).unwrap();

        let err = ws.init(None, None, false).unwrap_err();
        assert!(matches!(err, ApiError::WorkspaceExists(_)));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_init_force_keeps_project_rules() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        ws.init(None, None, false).unwrap();
        fs::write(ws.paths().figma_rules_file(), "custom").unwrap();

        ws.init(Some("vue"), None, true).unwrap();
        assert_eq!(
            fs::read_to_string(ws.paths().figma_rules_file()).unwrap(),
            "custom"
        );
        assert_eq!(ws.read_config().unwrap().framework, "vue");
    }

    #[test]
    fn test_default_project_name_is_root_dir_name() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("storefront");
        fs::create_dir_all(&root).unwrap();
        let ws = Workspace::open(&root, Defaults::Embedded);
        ws.init(None, None, false).unwrap();
        assert_eq!(ws.read_config().unwrap().project_name, "storefront");
    }

    #[test]
    fn test_read_config_corrupt_is_none() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        fs::create_dir_all(ws.paths().workspace_dir()).unwrap();
        fs::write(ws.paths().config_file(), "not json").unwrap();
        assert!(ws.read_config().is_none());
        assert_eq!(ws.resolve_framework(None), DEFAULT_FRAMEWORK);
    }

    #[test]
    fn test_list_files_requires_workspace() {
        let temp = TempDir::new().unwrap();
        let err = workspace(&temp).list_files(None).unwrap_err();
        assert!(matches!(err, ApiError::WorkspaceNotInitialized(_)));
    }

    #[test]
    fn test_list_files_with_filter() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        ws.init(None, None, false).unwrap();
        ws.save_document(DocKind::Requirement, "login", "# Login").unwrap();
        ws.save_document(DocKind::Api, "auth", "# Auth").unwrap();
        fs::write(ws.doc_dir(DocKind::Api).join("notes.txt"), "x").unwrap();

        let all = ws.list_files(None).unwrap();
        assert_eq!(all.summary.total, 5);
        assert_eq!(all.summary.by_type.get("api"), Some(&1));
        assert_eq!(all.summary.by_type.get("config"), Some(&1));

        let only_api = ws.list_files(Some(DocKind::Api)).unwrap();
        assert_eq!(only_api.summary.total, 4);
        assert!(only_api
            .files
            .iter()
            .all(|f| f.file_type != WorkspaceFileType::Requirement));
    }

    #[test]
    fn test_documents_round_trip_and_missing_lists_available() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        let path = ws
            .save_document(DocKind::Design, "checkout.md", "# Checkout")
            .unwrap();
        assert!(path.ends_with(".aiwork/designs/checkout.md"));

        match ws.read_document(DocKind::Design, "checkout").unwrap() {
            DocumentLookup::Found { content, .. } => assert_eq!(content, "# Checkout"),
            other => panic!("expected document, got {:?}", other),
        }

        match ws.read_document(DocKind::Design, "cart").unwrap() {
            DocumentLookup::Missing {
                file_name,
                available,
            } => {
                assert_eq!(file_name, "cart.md");
                assert_eq!(available, vec!["checkout.md".to_string()]);
            }
            other => panic!("expected missing, got {:?}", other),
        }
    }

    #[test]
    fn test_document_dir_override_from_config() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        ws.init(None, None, false).unwrap();
        let mut config = ws.read_config().unwrap();
        config.docs.as_mut().unwrap().api_dir = Some("contracts".to_string());
        persist::write_json_atomic(&ws.paths().config_file(), &config).unwrap();

        let path = ws.save_document(DocKind::Api, "orders", "x").unwrap();
        assert!(path.ends_with(".aiwork/contracts/orders.md"));
    }

    #[test]
    fn test_document_name_cannot_escape() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        let err = ws
            .save_document(DocKind::Api, "../../etc/passwd", "x")
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArguments(_)));
    }
}
