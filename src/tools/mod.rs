//! Tool layer: named operations with JSON input schemas and JSON results.
//!
//! Every result is a JSON object carrying a `success` flag. Handlers return
//! `Result<Value, ApiError>`; `ToolRegistry::dispatch` folds errors into
//! `{ "success": false, "error": ... }` for the transports.

pub mod context;
mod design;
mod figma;
pub mod registry;
mod sync;
mod workspace;

pub use context::{parse_args, ConnectionCounter, ToolContext};
pub use registry::{error_payload, ToolHandler, ToolRegistry, ToolSpec};
