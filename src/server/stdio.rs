//! JSON-RPC 2.0 over stdio for the coding assistant.
//!
//! One message per line. Requests get exactly one response line; notifications (no
//! `id`) get none. Tool failures are reported inside the result with `isError`, while
//! protocol failures become JSON-RPC error objects.

use crate::error::ApiError;
use crate::tools::{ToolContext, ToolRegistry};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "aiwork";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Serve requests from stdin until it closes.
pub async fn run_stdio(registry: Arc<ToolRegistry>, ctx: Arc<ToolContext>) -> Result<(), ApiError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    info!(tools = registry.names().len(), "Serving JSON-RPC on stdio");

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ApiError::Transport(format!("Failed to read stdin: {}", e)))?
    {
        if line.trim().is_empty() {
            continue;
        }
        let registry = registry.clone();
        let ctx = ctx.clone();
        // Tool handlers do blocking file I/O.
        let response = tokio::task::spawn_blocking(move || handle_message(&registry, &ctx, &line))
            .await
            .map_err(|e| ApiError::Transport(format!("Request task failed: {}", e)))?;

        if let Some(response) = response {
            let mut out = response.to_string();
            out.push('\n');
            stdout
                .write_all(out.as_bytes())
                .await
                .map_err(|e| ApiError::Transport(format!("Failed to write stdout: {}", e)))?;
            stdout
                .flush()
                .await
                .map_err(|e| ApiError::Transport(format!("Failed to flush stdout: {}", e)))?;
        }
    }

    info!("stdin closed, stopping JSON-RPC server");
    Ok(())
}

/// Handle one line and return the response to write, if any.
pub fn handle_message(registry: &ToolRegistry, ctx: &ToolContext, line: &str) -> Option<Value> {
    let request: Value = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed JSON-RPC message");
            return Some(error_response(
                Value::Null,
                RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
            ));
        }
    };

    let id = request.get("id").cloned().filter(|id| !id.is_null());
    let Some(method) = request.get("method").and_then(Value::as_str) else {
        return Some(error_response(
            id.unwrap_or(Value::Null),
            RpcError::new(INVALID_REQUEST, "Invalid request: missing method"),
        ));
    };

    let Some(id) = id else {
        debug!(method, "Notification received");
        return None;
    };

    let params = request.get("params").cloned().unwrap_or(Value::Null);
    let outcome = match method {
        "initialize" => Ok(initialize_result(&params)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": registry.list() })),
        "tools/call" => call_tool(registry, ctx, params),
        other => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {}", other),
        )),
    };

    Some(match outcome {
        Ok(result) => json!({ "jsonrpc": JSONRPC_VERSION, "id": id, "result": result }),
        Err(err) => error_response(id, err),
    })
}

fn initialize_result(params: &Value) -> Value {
    let protocol = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);
    json!({
        "protocolVersion": protocol,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

fn call_tool(registry: &ToolRegistry, ctx: &ToolContext, params: Value) -> Result<Value, RpcError> {
    let params: CallParams = serde_json::from_value(params)
        .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))?;

    let payload = registry.dispatch(ctx, &params.name, params.arguments);
    let failed = payload.get("success") == Some(&Value::Bool(false));
    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))?;

    let mut result = json!({ "content": [{ "type": "text", "text": text }] });
    if failed {
        result["isError"] = Value::Bool(true);
    }
    Ok(result)
}

fn error_response(id: Value, err: RpcError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": { "code": err.code, "message": err.message },
    })
}
