//! Error types for storage and API operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the persistence layer (sync snapshot, selection store, assets).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("I/O error at {}: {source}", .path.display())]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid asset payload for node {node_id}: {reason}")]
    InvalidAsset { node_id: String, reason: String },
}

impl StorageError {
    pub fn at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::PathIo {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors surfaced to callers of the tool layer and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Asset not found for node: {0}")]
    AssetNotFound(String),

    #[error("No selection available. Please select a layer in the design tool.")]
    NoSelection,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Workspace already initialized: {}", .0.display())]
    WorkspaceExists(PathBuf),

    #[error("Workspace not initialized: {}", .0.display())]
    WorkspaceNotInitialized(PathBuf),

    #[error("Invalid document type: {0} (valid types: requirement, design, interaction, api)")]
    InvalidDocumentKind(String),

    #[error("No rules files found")]
    RulesNotFound,

    #[error("Tech design rules not found")]
    TechRulesNotFound,

    #[error("Component mapping not found for framework \"{framework}\"")]
    ComponentMapNotFound {
        framework: String,
        available: Vec<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Follow-up hint shown to the assistant alongside the error, when one applies.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ApiError::WorkspaceExists(_) => {
                Some("Use force=true to overwrite existing config".to_string())
            }
            ApiError::WorkspaceNotInitialized(_) => {
                Some("Run init_workspace to create .aiwork/ directory".to_string())
            }
            ApiError::RulesNotFound => {
                Some("Run init_workspace to create .aiwork/ with default rules".to_string())
            }
            ApiError::TechRulesNotFound => Some(
                "Create .aiwork/tech-design-rules.md or run init_workspace".to_string(),
            ),
            ApiError::ComponentMapNotFound { available, .. } => Some(format!(
                "Available frameworks: {}",
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                }
            )),
            ApiError::NoSelection => {
                Some("Select a layer in the design tool with the plugin open".to_string())
            }
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
