//! Integration tests for change detection, sync persistence, tools and the CLI

mod change_detection;
mod cli_parse;
mod fingerprint_properties;
mod sync_store;
mod tools;
