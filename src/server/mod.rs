//! Transports: the plugin bridge and the assistant-facing stdio server.

pub mod bridge;
pub mod stdio;

pub use bridge::{handle_text, run_bridge};
pub use stdio::{handle_message, run_stdio};

use crate::error::ApiError;
use crate::tools::{ToolContext, ToolRegistry};
use std::sync::Arc;
use tracing::{info, warn};

/// Run the stdio server with the bridge alongside it.
///
/// Returns when stdin closes or on Ctrl-C. A bridge that fails to start is logged and
/// does not stop the stdio server.
pub async fn serve(registry: Arc<ToolRegistry>, ctx: Arc<ToolContext>) -> Result<(), ApiError> {
    if ctx.config().server.bridge_enabled {
        let bridge_ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = run_bridge(bridge_ctx).await {
                warn!(error = %e, "Bridge stopped");
            }
        });
    } else {
        info!("Bridge disabled by configuration");
    }

    tokio::select! {
        result = run_stdio(registry, ctx) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}

/// Run only the bridge, until Ctrl-C.
pub async fn serve_bridge(ctx: Arc<ToolContext>) -> Result<(), ApiError> {
    tokio::select! {
        result = run_bridge(ctx) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
