//! WebSocket bridge for the design plugin.
//!
//! The plugin connects, receives a `welcome`, and pushes `figma-selection` messages
//! whenever the designer selects a node. Each selection is persisted to the selection
//! store and acknowledged. Message handling is split from the socket loop so it can be
//! exercised without a network.

use crate::error::ApiError;
use crate::selection::{SelectionMessage, SelectionStore};
use crate::tools::{ConnectionCounter, ToolContext};
use chrono::{SecondsFormat, Utc};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::io;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, info, warn};

/// Message type the plugin uses for selection pushes.
pub const SELECTION_MESSAGE: &str = "figma-selection";

/// Accept plugin connections until the task is cancelled.
///
/// If the address is already taken (another instance owns the bridge), this logs and
/// returns `Ok(())` so the caller can keep serving without it.
pub async fn run_bridge(ctx: Arc<ToolContext>) -> Result<(), ApiError> {
    let address = ctx.config().server.bind_address();
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            warn!(
                address = %address,
                "Bridge address already in use, another instance is handling plugin connections"
            );
            return Ok(());
        }
        Err(e) => {
            return Err(ApiError::Transport(format!(
                "Failed to bind bridge on {}: {}",
                address, e
            )))
        }
    };
    info!(address = %address, "Bridge listening on ws://{}", address);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Failed to accept bridge connection");
                continue;
            }
        };
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_connection(&ctx, stream).await {
                warn!(peer = %peer, error = %e, "Bridge connection ended with error");
            }
        });
    }
}

/// Decrements the live connection count when a connection task ends.
struct ConnectionGuard(ConnectionCounter);

impl ConnectionGuard {
    fn register(counter: ConnectionCounter) -> Self {
        let live = counter.fetch_add(1, Ordering::SeqCst) + 1;
        info!(connections = live, "Plugin connected");
        Self(counter)
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let live = self.0.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        info!(connections = live, "Plugin disconnected");
    }
}

async fn serve_connection(ctx: &ToolContext, stream: TcpStream) -> Result<(), ApiError> {
    let socket = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|e| ApiError::Transport(format!("WebSocket handshake failed: {}", e)))?;
    let _guard = ConnectionGuard::register(ctx.connections());
    let (mut sink, mut source) = socket.split();

    send(&mut sink, &welcome()).await?;

    while let Some(frame) = source.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    warn!("Ignoring non UTF-8 binary frame");
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "Bridge read failed");
                break;
            }
        };
        if let Some(reply) = handle_text(ctx.selection(), &text) {
            send(&mut sink, &reply).await?;
        }
    }
    Ok(())
}

type PluginSink = SplitSink<WebSocketStream<TcpStream>, Message>;

async fn send(sink: &mut PluginSink, value: &Value) -> Result<(), ApiError> {
    sink.send(Message::Text(value.to_string()))
        .await
        .map_err(|e| ApiError::Transport(format!("WebSocket send failed: {}", e)))
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Greeting sent on connect.
pub fn welcome() -> Value {
    json!({
        "type": "welcome",
        "message": "Connected to aiwork server",
        "timestamp": now(),
    })
}

/// Handle one text frame from the plugin and return the reply, if any.
///
/// Malformed JSON, messages without a string `type`, and unknown types are logged and
/// produce no reply.
pub fn handle_text(store: &SelectionStore, text: &str) -> Option<Value> {
    let message: Value = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "Failed to parse bridge message");
            return None;
        }
    };
    let Some(kind) = message.get("type").and_then(Value::as_str) else {
        warn!("Invalid bridge message format");
        return None;
    };

    match kind {
        SELECTION_MESSAGE => {
            let selection: SelectionMessage = match serde_json::from_value(message.clone()) {
                Ok(selection) => selection,
                Err(e) => {
                    warn!(error = %e, "Invalid selection payload");
                    return None;
                }
            };
            match store.set_selection(selection) {
                Ok(record) => Some(json!({
                    "type": "ack",
                    "originalType": SELECTION_MESSAGE,
                    "nodeId": record.data.id,
                    "timestamp": now(),
                })),
                Err(e) => {
                    error!(error = %e, "Failed to store selection");
                    None
                }
            }
        }
        "ping" => Some(json!({ "type": "pong", "timestamp": now() })),
        other => {
            debug!(message_type = other, "Unknown bridge message type");
            None
        }
    }
}
