//! Project workspace domain: the `.aiwork/` layout, its config, documents and rules.

mod defaults;
mod facade;
mod format;
mod paths;
mod rules;
mod types;

pub use defaults::{DefaultFile, Defaults};
pub use facade::{document_stem, list_markdown, Workspace, DEFAULT_FRAMEWORK};
pub use format::{format_changes_text, format_section_heading, format_sync_status_text};
pub use paths::*;
pub use types::*;
