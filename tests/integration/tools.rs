//! Tool flows across the bridge, the stdio server and the registry.

use aiwork::config::AiworkConfig;
use aiwork::server::{handle_message, handle_text};
use aiwork::tools::{ToolContext, ToolRegistry};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn setup(temp: &TempDir) -> (ToolRegistry, ToolContext) {
    let mut config = AiworkConfig::default();
    config.storage.data_dir = Some(temp.path().join("data"));
    let root = temp.path().join("app");
    fs::create_dir_all(&root).unwrap();
    (ToolRegistry::new(), ToolContext::new(root, config))
}

fn push_selection(ctx: &ToolContext, title: &str) {
    let message = json!({
        "type": "figma-selection",
        "timestamp": "2026-02-01T10:00:00Z",
        "data": {
            "id": "1:1",
            "name": "Card",
            "type": "FRAME",
            "width": 320.0,
            "height": 200.0,
            "annotation": "Use the shared Card component",
            "children": [
                { "id": "1:2", "name": "Title", "type": "TEXT", "width": 100, "height": 20, "characters": title },
                { "id": "1:3", "name": "Logo", "type": "VECTOR", "width": 24, "height": 24 }
            ]
        },
        "assets": [
            { "type": "icon", "nodeId": "1:3", "nodeName": "Logo", "format": "svg", "data": "<svg/>" },
            { "type": "image", "nodeId": "1:1", "nodeName": "Card", "format": "png", "data": "iVBORw0KGgo=" }
        ]
    });
    let ack = handle_text(ctx.selection(), &message.to_string()).unwrap();
    assert_eq!(ack["nodeId"], "1:1");
}

fn call(registry: &ToolRegistry, ctx: &ToolContext, id: u64, name: &str, args: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": args }
    });
    let response = handle_message(registry, ctx, &request.to_string()).unwrap();
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[test]
fn test_generate_then_detect_edit() {
    let temp = TempDir::new().unwrap();
    let (registry, ctx) = setup(&temp);
    push_selection(&ctx, "Hello");

    let selection = call(&registry, &ctx, 1, "get_figma_selection", json!({}));
    assert_eq!(selection["meta"]["nodeCount"], 3);
    assert_eq!(selection["meta"]["assetCount"], 2);
    assert_eq!(selection["data"]["children"][0]["characters"], "Hello");

    let first = call(&registry, &ctx, 2, "check_design_changes", json!({}));
    assert_eq!(first["firstSync"], true);
    assert_eq!(first["summary"]["added"], 3);

    let icon = call(
        &registry,
        &ctx,
        3,
        "save_asset",
        json!({ "nodeId": "1:3", "outputPath": "src/assets/logo.svg" }),
    );
    assert_eq!(icon["success"], true);
    assert_eq!(
        fs::read_to_string(ctx.project_root().join("src/assets/logo.svg")).unwrap(),
        "<svg/>"
    );

    for (id, node, file) in [(4, "1:1", "src/Card.tsx"), (5, "1:2", "src/Title.tsx")] {
        let saved = call(
            &registry,
            &ctx,
            id,
            "save_generated_code",
            json!({ "filePath": file, "content": "// generated", "nodeId": node }),
        );
        assert_eq!(saved["syncRecorded"], true);
    }

    let clean = call(&registry, &ctx, 6, "check_design_changes", json!({}));
    assert_eq!(clean["firstSync"], false);
    assert_eq!(clean["summary"]["modified"], 0);
    assert_eq!(clean["summary"]["added"], 1);

    push_selection(&ctx, "World");
    let edited = call(&registry, &ctx, 7, "check_design_changes", json!({}));
    assert_eq!(edited["hasChanges"], true);
    assert_eq!(edited["summary"]["modified"], 2);
    assert_eq!(
        edited["summary"]["affectedFiles"],
        json!(["src/Card.tsx", "src/Title.tsx"])
    );

    let status = call(&registry, &ctx, 8, "get_sync_status", json!({}));
    assert_eq!(status["trackedNodes"], 2);
}

#[test]
fn test_missing_asset_and_bad_arguments() {
    let temp = TempDir::new().unwrap();
    let (registry, ctx) = setup(&temp);
    push_selection(&ctx, "Hello");

    let missing = call(
        &registry,
        &ctx,
        1,
        "save_asset",
        json!({ "nodeId": "7:7", "outputPath": "x.png" }),
    );
    assert_eq!(missing["success"], false);

    let bad = call(&registry, &ctx, 2, "save_generated_code", json!({ "content": "x" }));
    assert_eq!(bad["success"], false);
    assert!(bad["error"].as_str().unwrap().contains("filePath"));
}

#[test]
fn test_workspace_documents_and_rules() {
    let temp = TempDir::new().unwrap();
    let (registry, ctx) = setup(&temp);

    let rules_before = call(&registry, &ctx, 1, "get_code_rules", json!({}));
    assert_eq!(rules_before["success"], true);
    assert_eq!(rules_before["framework"], "react-native");

    let init = call(
        &registry,
        &ctx,
        2,
        "init_workspace",
        json!({ "framework": "react", "projectName": "shop" }),
    );
    assert_eq!(init["success"], true);

    let again = call(&registry, &ctx, 3, "init_workspace", json!({}));
    assert_eq!(again["success"], false);
    assert!(again["suggestion"].is_string());

    let mapping = call(&registry, &ctx, 4, "get_component_mapping", json!({}));
    assert_eq!(mapping["framework"], "react");

    call(
        &registry,
        &ctx,
        5,
        "save_document",
        json!({ "type": "requirement", "name": "checkout", "content": "# Checkout" }),
    );
    let listing = call(
        &registry,
        &ctx,
        6,
        "list_workspace_files",
        json!({ "type": "requirement" }),
    );
    // Config and rule files are always listed; the filter applies to documents.
    assert_eq!(listing["summary"]["byType"]["requirement"], 1);
    assert_eq!(listing["summary"]["total"], 4);
    assert_eq!(listing["files"][3]["name"], "checkout.md");

    let doc = call(&registry, &ctx, 7, "get_requirement", json!({ "name": "checkout" }));
    assert_eq!(doc["content"], "# Checkout");

    let other_root = temp.path().join("other");
    let elsewhere = call(
        &registry,
        &ctx,
        8,
        "get_workspace_config",
        json!({ "projectRoot": other_root.to_string_lossy() }),
    );
    assert_eq!(elsewhere["success"], false);
}

#[test]
fn test_server_status_reports_selection() {
    let temp = TempDir::new().unwrap();
    let (registry, ctx) = setup(&temp);

    let before = call(&registry, &ctx, 1, "get_server_status", json!({}));
    assert_eq!(before["status"]["hasSelection"], false);
    assert_eq!(before["status"]["pluginConnected"], false);

    push_selection(&ctx, "Hello");
    let after = call(&registry, &ctx, 2, "get_server_status", json!({}));
    assert_eq!(after["status"]["hasSelection"], true);
    assert_eq!(after["status"]["historyCount"], 1);
    assert_eq!(after["workspace"]["initialized"], false);
}
