//! aiwork: Design-Tree Bridge with Incremental Change Detection
//!
//! Receives node trees selected in a design tool, exposes them to an AI coding
//! assistant as callable tools, and tracks which design nodes changed since code was
//! last generated from them. Change detection compares content fingerprints of each
//! node's significant visual properties against a per-project sync snapshot and
//! reports the generated files each change affects.

pub mod asset;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod persist;
pub mod selection;
pub mod server;
pub mod sync;
pub mod tooling;
pub mod tools;
pub mod tree;
pub mod types;
pub mod workspace;
