//! Selection-facing tools: current selection, rules, component maps, assets, status.

use crate::asset::{find_asset, write_asset};
use crate::error::ApiError;
use crate::tools::context::{parse_args, ToolContext};
use crate::tools::registry::{object_schema, project_root_property, ToolSpec};
use crate::tree::walk;
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) fn tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "get_figma_selection",
            description: "Get the node currently selected in the design plugin. Returns the full \
                node tree (identity, size and position, auto layout, fills, strokes, corner radii, \
                effects, text properties, component instance info, designer annotations) plus the \
                exported assets.",
            input_schema: || object_schema(json!({}), &[]),
            handler: get_figma_selection,
        },
        ToolSpec {
            name: "get_code_rules",
            description: "Read the code generation rules (markdown). Layers, lowest priority \
                first: built-in base rules, framework rules, and the project's \
                .aiwork/figma-rules.md. Returns the merged text.",
            input_schema: || {
                object_schema(
                    json!({
                        "projectRoot": project_root_property(),
                        "framework": {
                            "type": "string",
                            "description": "Target framework (e.g. react-native); defaults to the workspace config"
                        }
                    }),
                    &[],
                )
            },
            handler: get_code_rules,
        },
        ToolSpec {
            name: "get_component_mapping",
            description: "Get the mapping from design components to target framework components \
                for the given or configured framework.",
            input_schema: || {
                object_schema(
                    json!({
                        "projectRoot": project_root_property(),
                        "framework": {
                            "type": "string",
                            "description": "Target framework (e.g. react-native); defaults to the workspace config"
                        }
                    }),
                    &[],
                )
            },
            handler: get_component_mapping,
        },
        ToolSpec {
            name: "save_asset",
            description: "Save an exported asset (image, icon) from the current selection into \
                the project.",
            input_schema: || {
                object_schema(
                    json!({
                        "nodeId": { "type": "string", "description": "Design node id" },
                        "outputPath": { "type": "string", "description": "Output file path" },
                        "projectRoot": project_root_property()
                    }),
                    &["nodeId", "outputPath"],
                )
            },
            handler: save_asset,
        },
        ToolSpec {
            name: "get_server_status",
            description: "Get server status: plugin connection, cached selection and workspace \
                state.",
            input_schema: || object_schema(json!({ "projectRoot": project_root_property() }), &[]),
            handler: get_server_status,
        },
    ]
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameworkArgs {
    project_root: Option<String>,
    framework: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveAssetArgs {
    node_id: String,
    output_path: String,
    project_root: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RootArgs {
    project_root: Option<String>,
}

fn get_figma_selection(ctx: &ToolContext, _args: Value) -> Result<Value, ApiError> {
    let selection = ctx.selection().current().ok_or(ApiError::NoSelection)?;
    Ok(json!({
        "success": true,
        "meta": {
            "nodeCount": walk::count_nodes(&selection.data),
            "assetCount": selection.assets.len(),
            "annotations": walk::collect_annotations(&selection.data),
        },
        "data": selection.data,
        "assets": selection.assets,
        "timestamp": selection.timestamp,
    }))
}

fn get_code_rules(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: FrameworkArgs = parse_args(args)?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let rules = workspace.code_rules(args.framework.as_deref())?;
    Ok(json!({
        "success": true,
        "rules": rules.rules,
        "framework": rules.framework,
        "layers": rules.layers,
    }))
}

fn get_component_mapping(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: FrameworkArgs = parse_args(args)?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let (framework, mapping, source) = workspace.component_map(args.framework.as_deref())?;
    Ok(json!({
        "success": true,
        "mapping": mapping,
        "framework": framework,
        "mappingPath": source,
    }))
}

fn save_asset(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: SaveAssetArgs = parse_args(args)?;
    let selection = ctx.selection().current().ok_or(ApiError::NoSelection)?;
    let asset = find_asset(&selection.assets, &args.node_id)
        .ok_or_else(|| ApiError::AssetNotFound(args.node_id.clone()))?;

    let root = ctx.resolve_root(args.project_root.as_deref());
    let path = write_asset(asset, &ctx.resolve_path(&root, &args.output_path))?;
    Ok(json!({
        "success": true,
        "filePath": path,
        "assetType": asset.asset_type,
        "format": asset.format,
    }))
}

fn get_server_status(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: RootArgs = parse_args(args)?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let stats = ctx.selection().stats();
    let config = workspace.read_config();
    let connections = ctx.connection_count();

    Ok(json!({
        "success": true,
        "status": {
            "pluginConnected": connections > 0,
            "connectionCount": connections,
            "hasSelection": stats.has_selection,
            "historyCount": stats.history_count,
            "lastUpdate": stats.last_update,
            "dataPath": ctx.selection().data_path(),
        },
        "workspace": {
            "initialized": config.is_some(),
            "path": workspace.paths().workspace_dir(),
            "config": config.map(|c| json!({
                "projectName": c.project_name,
                "framework": c.framework,
                "stateManagement": c.state_management,
            })),
        },
    }))
}
