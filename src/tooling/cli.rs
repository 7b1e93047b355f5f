//! CLI Tooling
//!
//! Command-line interface for the aiwork server: run the transports, inspect and call
//! tools, check design changes, and manage the project workspace.

use crate::config::{AiworkConfig, ConfigLoader};
use crate::error::{ApiError, StorageError};
use crate::server;
use crate::sync::check;
use crate::tools::{ToolContext, ToolRegistry};
use crate::tree::NodeRecord;
use crate::workspace::{format_changes_text, format_section_heading, format_sync_status_text};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// aiwork - design-tree bridge for AI coding assistants
#[derive(Parser)]
#[command(name = "aiwork")]
#[command(about = "Bridge design selections to AI coding assistants with incremental change detection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve tools over stdio JSON-RPC, with the plugin bridge alongside
    Serve,
    /// Run only the plugin bridge
    Bridge,
    /// List available tools
    Tools,
    /// Call a tool and print its JSON result
    Call {
        /// Tool name
        name: String,
        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
    /// Compare a node tree with the last generation
    Changes {
        /// Node tree JSON file (defaults to the current selection)
        #[arg(long)]
        tree: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Initialize the .aiwork/ workspace
    Init {
        /// Project framework
        #[arg(long)]
        framework: Option<String>,
        /// Project name (defaults to the directory name)
        #[arg(long)]
        project_name: Option<String>,
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Show sync, selection and workspace status
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context holding the loaded config and tool state.
pub struct CliContext {
    workspace_root: PathBuf,
    registry: Arc<ToolRegistry>,
    tools: Arc<ToolContext>,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(&workspace_root, config_path.as_deref())?;
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: AiworkConfig) -> Self {
        let tools = ToolContext::new(workspace_root.clone(), config);
        Self {
            workspace_root,
            registry: Arc::new(ToolRegistry::new()),
            tools: Arc::new(tools),
        }
    }

    pub fn tool_context(&self) -> &ToolContext {
        &self.tools
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Serve => {
                let runtime = runtime()?;
                runtime.block_on(server::serve(self.registry.clone(), self.tools.clone()))?;
                Ok(String::new())
            }
            Commands::Bridge => {
                let runtime = runtime()?;
                runtime.block_on(server::serve_bridge(self.tools.clone()))?;
                Ok(String::new())
            }
            Commands::Tools => Ok(self.list_tools()),
            Commands::Call { name, args } => self.call_tool(name, args.as_deref()),
            Commands::Changes { tree, format } => self.changes(tree.as_deref(), format),
            Commands::Init {
                framework,
                project_name,
                force,
            } => self.init(framework.as_deref(), project_name.as_deref(), *force),
            Commands::Status { format } => self.status(format),
        }
    }

    fn list_tools(&self) -> String {
        let mut out = format!("{}\n\n", format_section_heading("Tools"));
        for name in self.registry.names() {
            let description = self
                .registry
                .get(name)
                .map(|t| t.description.split_whitespace().collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            out.push_str(&format!("  {:<24} {}\n", name, description));
        }
        out
    }

    fn call_tool(&self, name: &str, args: Option<&str>) -> Result<String, ApiError> {
        let args: Value = match args {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| ApiError::InvalidArguments(format!("--args is not valid JSON: {}", e)))?,
            None => json!({}),
        };
        let result = self.registry.call(&self.tools, name, args)?;
        Ok(serde_json::to_string_pretty(&result).map_err(StorageError::from)?)
    }

    fn changes(&self, tree: Option<&Path>, format: &str) -> Result<String, ApiError> {
        let tree = match tree {
            Some(path) => read_tree(path)?,
            None => {
                self.tools
                    .selection()
                    .current()
                    .ok_or(ApiError::NoSelection)?
                    .data
            }
        };
        let store = self.tools.sync_store(&self.workspace_root);
        let report = check(&store.load(), &tree);
        info!(root = %tree.id, total = report.total_changes, "Checked design changes");

        match format {
            "json" => Ok(serde_json::to_string_pretty(&report).map_err(StorageError::from)?),
            "text" => Ok(format_changes_text(&report)),
            other => Err(invalid_format(other)),
        }
    }

    fn init(
        &self,
        framework: Option<&str>,
        project_name: Option<&str>,
        force: bool,
    ) -> Result<String, ApiError> {
        let workspace = self.tools.workspace(&self.workspace_root);
        let report = workspace.init(framework, project_name, force)?;

        let mut out = format!("Initialized workspace at {}\n", report.workspace_path.display());
        out.push_str(&format!("  Config: {}\n", report.config_path.display()));
        for file in &report.created_files {
            out.push_str(&format!("  Created: {}\n", file.display()));
        }
        for dir in &report.directories {
            out.push_str(&format!("  Directory: {}\n", dir.display()));
        }
        Ok(out)
    }

    fn status(&self, format: &str) -> Result<String, ApiError> {
        let sync = self.tools.sync_store(&self.workspace_root).status();
        let selection = self.tools.selection().stats();
        let workspace = self.tools.workspace(&self.workspace_root);
        let initialized = workspace.is_initialized();

        match format {
            "json" => {
                let value = json!({
                    "workspace": {
                        "path": workspace.paths().workspace_dir(),
                        "initialized": initialized,
                    },
                    "selection": selection,
                    "sync": sync,
                });
                Ok(serde_json::to_string_pretty(&value).map_err(StorageError::from)?)
            }
            "text" => {
                let mut out = format!("{}\n\n", format_section_heading("Workspace"));
                out.push_str(&format!(
                    "  Path: {}\n",
                    workspace.paths().workspace_dir().display()
                ));
                out.push_str(&format!(
                    "  Initialized: {}\n\n",
                    if initialized { "yes" } else { "no" }
                ));
                out.push_str(&format!("{}\n\n", format_section_heading("Selection")));
                out.push_str(&format!(
                    "  Current: {}\n",
                    if selection.has_selection { "yes" } else { "none" }
                ));
                out.push_str(&format!("  History: {}\n", selection.history_count));
                if let Some(last) = &selection.last_update {
                    out.push_str(&format!("  Last update: {}\n", last));
                }
                out.push('\n');
                out.push_str(&format_sync_status_text(&sync));
                Ok(out)
            }
            other => Err(invalid_format(other)),
        }
    }
}

fn load_config(workspace_root: &Path, config_path: Option<&Path>) -> Result<AiworkConfig, ApiError> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(workspace_root)?,
    };
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, ApiError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ApiError::Transport(format!("Failed to create runtime: {}", e)))
}

fn read_tree(path: &Path) -> Result<NodeRecord, ApiError> {
    let raw = std::fs::read_to_string(path).map_err(|e| StorageError::at(path, e))?;
    serde_json::from_str(&raw).map_err(|e| {
        ApiError::InvalidArguments(format!("{} is not a node tree: {}", path.display(), e))
    })
}

fn invalid_format(format: &str) -> ApiError {
    ApiError::InvalidArguments(format!(
        "Unknown format '{}', expected 'text' or 'json'",
        format
    ))
}
