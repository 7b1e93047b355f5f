//! Sync tools: change checks against the last generation, code saves, sync status.

use crate::error::{ApiError, StorageError};
use crate::sync::{check, SyncEntry};
use crate::tools::context::{parse_args, ToolContext};
use crate::tools::registry::{object_schema, project_root_property, ToolSpec};
use crate::tree::fingerprint;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use tracing::{info, warn};

pub(crate) fn tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "check_design_changes",
            description: "Compare the current selection with the last code generation and report \
                which nodes were added, modified or deleted, plus the generated files affected.",
            input_schema: || object_schema(json!({ "projectRoot": project_root_property() }), &[]),
            handler: check_design_changes,
        },
        ToolSpec {
            name: "save_generated_code",
            description: "Write generated code to a file. When nodeId names a node of the current \
                selection, the node's fingerprint is recorded so later change checks compare \
                against this generation.",
            input_schema: || {
                object_schema(
                    json!({
                        "projectRoot": project_root_property(),
                        "filePath": { "type": "string", "description": "File path, relative to the project root" },
                        "content": { "type": "string", "description": "File content" },
                        "nodeId": { "type": "string", "description": "Design node the code was generated from" },
                        "assets": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Asset files written for this node"
                        }
                    }),
                    &["filePath", "content"],
                )
            },
            handler: save_generated_code,
        },
        ToolSpec {
            name: "get_sync_status",
            description: "Get the last sync time and the nodes tracked for change detection.",
            input_schema: || object_schema(json!({ "projectRoot": project_root_property() }), &[]),
            handler: get_sync_status,
        },
    ]
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RootArgs {
    project_root: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveCodeArgs {
    project_root: Option<String>,
    file_path: String,
    content: String,
    node_id: Option<String>,
    #[serde(default)]
    assets: Vec<String>,
}

fn check_design_changes(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: RootArgs = parse_args(args)?;
    let selection = ctx.selection().current().ok_or(ApiError::NoSelection)?;
    let store = ctx.sync_store(&ctx.resolve_root(args.project_root.as_deref()));

    let previous = store.load();
    let report = check(&previous, &selection.data);
    info!(
        root = %selection.data.id,
        total = report.total_changes,
        "Checked design changes"
    );

    Ok(json!({
        "success": true,
        "nodeId": selection.data.id,
        "nodeName": selection.data.name,
        "firstSync": previous.is_empty(),
        "lastSync": previous.last_sync,
        "hasChanges": report.has_changes(),
        "summary": {
            "totalChanges": report.total_changes,
            "added": report.added,
            "modified": report.modified,
            "deleted": report.deleted,
            "affectedFiles": report.affected_files,
        },
        "changes": report.changes,
    }))
}

fn save_generated_code(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: SaveCodeArgs = parse_args(args)?;
    if args.file_path.trim().is_empty() {
        return Err(ApiError::InvalidArguments("filePath must not be empty".to_string()));
    }
    let root = ctx.resolve_root(args.project_root.as_deref());
    let path = ctx.resolve_path(&root, &args.file_path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::at(parent, e))?;
    }
    fs::write(&path, &args.content).map_err(|e| StorageError::at(&path, e))?;
    info!(path = %path.display(), bytes = args.content.len(), "Generated code saved");

    let mut result = json!({
        "success": true,
        "filePath": path,
        "bytes": args.content.len(),
        "syncRecorded": false,
    });

    let Some(node_id) = args.node_id.filter(|id| !id.is_empty()) else {
        return Ok(result);
    };

    let node = ctx
        .selection()
        .current()
        .and_then(|s| s.data.find(&node_id).cloned());
    let Some(node) = node else {
        warn!(node_id = %node_id, "Node not in current selection, sync record not updated");
        result["warning"] = json!(format!(
            "Node {} is not part of the current selection; sync record not updated",
            node_id
        ));
        return Ok(result);
    };

    let node_fingerprint = fingerprint(&node);
    let entry = SyncEntry::new(node.name.clone(), node_fingerprint.clone(), args.file_path)
        .with_assets(args.assets);
    let snapshot = ctx.sync_store(&root).record_generation(&node_id, entry)?;

    result["syncRecorded"] = json!(true);
    result["nodeId"] = json!(node_id);
    result["fingerprint"] = json!(node_fingerprint);
    result["lastSync"] = json!(snapshot.last_sync);
    Ok(result)
}

fn get_sync_status(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: RootArgs = parse_args(args)?;
    let status = ctx
        .sync_store(&ctx.resolve_root(args.project_root.as_deref()))
        .status();
    Ok(json!({
        "success": true,
        "syncFile": status.sync_file,
        "lastSync": status.last_sync,
        "trackedNodes": status.tracked_nodes,
        "nodes": status.nodes,
    }))
}
