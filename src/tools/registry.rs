//! Tool registry: names, input schemas and handlers behind one dispatch seam.

use crate::error::ApiError;
use crate::tools::context::ToolContext;
use crate::tools::{design, figma, sync, workspace};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

pub type ToolHandler = fn(&ToolContext, Value) -> Result<Value, ApiError>;

/// One callable tool.
#[derive(Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: fn() -> Value,
    pub handler: ToolHandler,
}

impl ToolSpec {
    /// Schema entry as advertised by `tools/list`.
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": (self.input_schema)(),
        })
    }
}

/// Every tool the server exposes, in listing order.
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let mut tools = Vec::new();
        tools.extend(figma::tools());
        tools.extend(sync::tools());
        tools.extend(workspace::tools());
        tools.extend(design::tools());
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn list(&self) -> Vec<Value> {
        self.tools.iter().map(ToolSpec::describe).collect()
    }

    /// Run a tool, surfacing failures as errors.
    pub fn call(&self, ctx: &ToolContext, name: &str, args: Value) -> Result<Value, ApiError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ApiError::UnknownTool(name.to_string()))?;
        debug!(tool = name, "Calling tool");
        (tool.handler)(ctx, args)
    }

    /// Run a tool and fold any failure into a `{success: false, error, ...}` payload.
    pub fn dispatch(&self, ctx: &ToolContext, name: &str, args: Value) -> Value {
        match self.call(ctx, name, args) {
            Ok(value) => value,
            Err(err) => {
                warn!(tool = name, error = %err, "Tool failed");
                error_payload(ctx, &err)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure payload for a tool error, with hints the assistant can act on.
pub fn error_payload(ctx: &ToolContext, err: &ApiError) -> Value {
    let mut payload = Map::new();
    payload.insert("success".into(), Value::Bool(false));
    payload.insert("error".into(), Value::String(err.to_string()));
    if let Some(suggestion) = err.suggestion() {
        payload.insert("suggestion".into(), Value::String(suggestion));
    }
    match err {
        ApiError::NoSelection => {
            payload.insert(
                "connectionStatus".into(),
                json!({ "pluginConnected": ctx.connection_count() > 0 }),
            );
        }
        ApiError::ComponentMapNotFound { available, .. } => {
            payload.insert("availableFrameworks".into(), json!(available));
        }
        ApiError::WorkspaceExists(path) => {
            payload.insert("configPath".into(), json!(path));
        }
        ApiError::InvalidDocumentKind(_) => {
            payload.insert(
                "validTypes".into(),
                json!(["requirement", "design", "interaction", "api"]),
            );
        }
        _ => {}
    }
    Value::Object(payload)
}

/// Object schema with the given properties and required keys.
pub(crate) fn object_schema(properties: Value, required: &[&str]) -> Value {
    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// Schema fragment for the optional `projectRoot` argument.
pub(crate) fn project_root_property() -> Value {
    json!({
        "type": "string",
        "description": "Target project root directory; defaults to the server's project root"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiworkConfig;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> ToolContext {
        let mut config = AiworkConfig::default();
        config.storage.data_dir = Some(temp.path().join("data"));
        ToolContext::new(temp.path().to_path_buf(), config)
    }

    #[test]
    fn test_all_tools_registered_once() {
        let registry = ToolRegistry::new();
        let names = registry.names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        for expected in [
            "get_figma_selection",
            "get_code_rules",
            "get_component_mapping",
            "save_asset",
            "get_server_status",
            "check_design_changes",
            "save_generated_code",
            "get_sync_status",
            "init_workspace",
            "get_workspace_config",
            "list_workspace_files",
            "get_requirement",
            "get_tech_design",
            "get_interaction_spec",
            "get_api_spec",
            "save_document",
            "get_tech_design_rules",
        ] {
            assert!(registry.get(expected).is_some(), "missing tool {}", expected);
        }
    }

    #[test]
    fn test_list_entries_have_object_schemas() {
        for entry in ToolRegistry::new().list() {
            assert!(entry["name"].is_string());
            assert!(entry["description"].is_string());
            assert_eq!(entry["inputSchema"]["type"], "object");
        }
    }

    #[test]
    fn test_unknown_tool() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let registry = ToolRegistry::new();
        assert!(matches!(
            registry.call(&ctx, "nope", Value::Null),
            Err(ApiError::UnknownTool(_))
        ));
        let payload = registry.dispatch(&ctx, "nope", Value::Null);
        assert_eq!(payload["success"], false);
        assert!(payload["error"].as_str().unwrap().contains("nope"));
    }

    #[test]
    fn test_no_selection_payload_reports_connection() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let payload = ToolRegistry::new().dispatch(&ctx, "get_figma_selection", Value::Null);
        assert_eq!(payload["success"], false);
        assert_eq!(payload["connectionStatus"]["pluginConnected"], false);
    }
}
