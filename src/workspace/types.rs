//! Shared types for the `.aiwork/` workspace: config file shape and command results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// `.aiwork/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    pub project_name: String,
    pub framework: String,
    pub styling: StylingConfig,
    pub output: OutputConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_management: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_lib: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocsConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylingConfig {
    #[serde(rename = "type")]
    pub styling_type: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub component_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_dir: Option<String>,
    pub asset_dir: String,
}

/// Overrides for the document directory names under `.aiwork/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designs_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_dir: Option<String>,
}

impl WorkspaceConfig {
    /// Configuration written by `init` for a fresh workspace.
    pub fn initial(project_name: String, framework: String) -> Self {
        WorkspaceConfig {
            project_name,
            framework,
            styling: StylingConfig {
                styling_type: "stylesheet".to_string(),
                unit: "dp".to_string(),
            },
            output: OutputConfig {
                component_dir: "./src/components".to_string(),
                screen_dir: Some("./src/screens".to_string()),
                asset_dir: "./src/assets".to_string(),
            },
            assets: None,
            state_management: Some("zustand".to_string()),
            network_lib: None,
            navigation: None,
            docs: Some(DocsConfig {
                requirements_dir: Some(DocKind::Requirement.default_dir().to_string()),
                designs_dir: Some(DocKind::Design.default_dir().to_string()),
                interactions_dir: Some(DocKind::Interaction.default_dir().to_string()),
                api_dir: Some(DocKind::Api.default_dir().to_string()),
            }),
        }
    }
}

/// Kinds of markdown documents kept in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Requirement,
    Design,
    Interaction,
    Api,
}

impl DocKind {
    pub const ALL: [DocKind; 4] = [
        DocKind::Requirement,
        DocKind::Design,
        DocKind::Interaction,
        DocKind::Api,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Requirement => "requirement",
            DocKind::Design => "design",
            DocKind::Interaction => "interaction",
            DocKind::Api => "api",
        }
    }

    pub fn parse(s: &str) -> Option<DocKind> {
        DocKind::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn default_dir(self) -> &'static str {
        match self {
            DocKind::Requirement => "requirements",
            DocKind::Design => "designs",
            DocKind::Interaction => "interactions",
            DocKind::Api => "api",
        }
    }

    /// Human label used in "not found" messages.
    pub fn label(self) -> &'static str {
        match self {
            DocKind::Requirement => "Requirement",
            DocKind::Design => "Tech design",
            DocKind::Interaction => "Interaction spec",
            DocKind::Api => "API spec",
        }
    }

    /// Directory for this kind, honouring `docs.*Dir` overrides.
    pub fn dir_name(self, config: Option<&WorkspaceConfig>) -> String {
        let docs = config.and_then(|c| c.docs.as_ref());
        let configured = docs.and_then(|d| match self {
            DocKind::Requirement => d.requirements_dir.clone(),
            DocKind::Design => d.designs_dir.clone(),
            DocKind::Interaction => d.interactions_dir.clone(),
            DocKind::Api => d.api_dir.clone(),
        });
        configured
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| self.default_dir().to_string())
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a file listed in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceFileType {
    Config,
    FigmaRules,
    TechRules,
    Requirement,
    Design,
    Interaction,
    Api,
}

impl WorkspaceFileType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceFileType::Config => "config",
            WorkspaceFileType::FigmaRules => "figma-rules",
            WorkspaceFileType::TechRules => "tech-rules",
            WorkspaceFileType::Requirement => "requirement",
            WorkspaceFileType::Design => "design",
            WorkspaceFileType::Interaction => "interaction",
            WorkspaceFileType::Api => "api",
        }
    }
}

impl From<DocKind> for WorkspaceFileType {
    fn from(kind: DocKind) -> Self {
        match kind {
            DocKind::Requirement => WorkspaceFileType::Requirement,
            DocKind::Design => WorkspaceFileType::Design,
            DocKind::Interaction => WorkspaceFileType::Interaction,
            DocKind::Api => WorkspaceFileType::Api,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFile {
    #[serde(rename = "type")]
    pub file_type: WorkspaceFileType,
    pub path: PathBuf,
    pub name: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

/// Result of listing workspace files.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListing {
    pub workspace_path: PathBuf,
    pub files: Vec<WorkspaceFile>,
    pub summary: FileSummary,
}

/// Result of `init`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    pub workspace_path: PathBuf,
    pub config_path: PathBuf,
    pub created_files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

/// Markdown file under a document directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownFile {
    pub name: String,
    pub path: PathBuf,
    pub last_modified: String,
}

/// Outcome of reading a document: its content, or the files that do exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLookup {
    Found { path: PathBuf, content: String },
    Missing { file_name: String, available: Vec<String> },
}

/// Merged code-generation rules and where each layer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRules {
    pub rules: String,
    pub framework: String,
    pub layers: RuleLayers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleLayers {
    pub base: Option<String>,
    pub framework: Option<String>,
    pub project: Option<String>,
}

/// One mapping rule from a design component to a framework component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMapRule {
    #[serde(rename = "match")]
    pub match_on: ComponentMatch,
    pub map: ComponentTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMatch {
    #[serde(rename = "type")]
    pub match_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTarget {
    pub component: String,
    pub import: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_children: Option<bool>,
}

/// `component-maps/<framework>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMap {
    pub rules: Vec<ComponentMapRule>,
    #[serde(default)]
    pub fallback: BTreeMap<String, String>,
}
