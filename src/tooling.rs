//! Tooling & Integration Layer
//!
//! Command-line entry points over the tool registry and transports.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
