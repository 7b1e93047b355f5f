//! Workspace tools: init, config, file listing.

use crate::error::{ApiError, StorageError};
use crate::tools::context::{parse_args, ToolContext};
use crate::tools::registry::{object_schema, project_root_property, ToolSpec};
use crate::workspace::DocKind;
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) fn tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "init_workspace",
            description: "Initialize the .aiwork/ workspace: config.json, figma-rules.md, \
                tech-design-rules.md and the requirements/, designs/, interactions/ and api/ \
                document directories.",
            input_schema: || {
                object_schema(
                    json!({
                        "projectRoot": project_root_property(),
                        "framework": {
                            "type": "string",
                            "description": "Project framework (react-native, react, vue, flutter)"
                        },
                        "projectName": { "type": "string", "description": "Project name" },
                        "force": { "type": "boolean", "description": "Overwrite an existing config" }
                    }),
                    &[],
                )
            },
            handler: init_workspace,
        },
        ToolSpec {
            name: "get_workspace_config",
            description: "Read .aiwork/config.json: project name, framework, styling, output \
                directories, state management and document directories.",
            input_schema: || object_schema(json!({ "projectRoot": project_root_property() }), &[]),
            handler: get_workspace_config,
        },
        ToolSpec {
            name: "list_workspace_files",
            description: "List the files in the .aiwork/ workspace: config, rule files and \
                requirement, design, interaction and API documents.",
            input_schema: || {
                object_schema(
                    json!({
                        "projectRoot": project_root_property(),
                        "type": {
                            "type": "string",
                            "description": "Only list documents of this type (requirement, design, interaction, api)"
                        }
                    }),
                    &[],
                )
            },
            handler: list_workspace_files,
        },
    ]
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitArgs {
    project_root: Option<String>,
    framework: Option<String>,
    project_name: Option<String>,
    #[serde(default)]
    force: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RootArgs {
    project_root: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    project_root: Option<String>,
    #[serde(rename = "type")]
    file_type: Option<String>,
}

fn init_workspace(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: InitArgs = parse_args(args)?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let report = workspace.init(
        args.framework.as_deref(),
        args.project_name.as_deref(),
        args.force,
    )?;
    Ok(json!({
        "success": true,
        "message": "Workspace initialized successfully",
        "workspacePath": report.workspace_path,
        "createdFiles": report.created_files,
        "directories": report.directories,
    }))
}

fn get_workspace_config(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: RootArgs = parse_args(args)?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let config_path = workspace.paths().config_file();
    if !config_path.is_file() {
        return Err(ApiError::WorkspaceNotInitialized(
            workspace.paths().workspace_dir().to_path_buf(),
        ));
    }
    let config = workspace.read_config().ok_or_else(|| {
        ApiError::ConfigError(format!("Failed to parse config file {}", config_path.display()))
    })?;
    Ok(json!({
        "success": true,
        "config": config,
        "configPath": config_path,
    }))
}

fn list_workspace_files(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: ListArgs = parse_args(args)?;
    let filter = match args.file_type.as_deref().filter(|t| !t.is_empty()) {
        Some(t) => Some(
            DocKind::parse(t).ok_or_else(|| ApiError::InvalidDocumentKind(t.to_string()))?,
        ),
        None => None,
    };
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let listing = workspace.list_files(filter)?;

    let mut result = serde_json::to_value(&listing).map_err(StorageError::from)?;
    result["success"] = json!(true);
    Ok(result)
}
