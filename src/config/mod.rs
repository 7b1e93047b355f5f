//! Configuration System
//!
//! Layered application configuration built with the `config` crate. Precedence,
//! lowest to highest: built-in defaults, the global file
//! `$XDG_CONFIG_HOME/aiwork/config.toml`, the project file `<project>/.aiwork/server.toml`,
//! then `AIWORK__SECTION__KEY` environment variables.

mod facade;
mod merge;
mod paths;
mod sources;
mod workspace;

pub use facade::ConfigLoader;
pub(crate) use paths::xdg_root as xdg;
pub use workspace::storage_paths::StorageConfig;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "AIWORK";

/// Default bind address of the plugin bridge.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port of the plugin bridge; the plugin connects here.
pub const DEFAULT_PORT: u16 = 3001;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiworkConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Directory holding rule files and component maps; embedded copies are used when unset.
    #[serde(default)]
    pub defaults_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Plugin bridge settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Start the bridge alongside the stdio server
    #[serde(default = "default_true")]
    pub bridge_enabled: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bridge_enabled: true,
        }
    }
}
