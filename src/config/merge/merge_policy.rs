//! Merge policy: the built-in defaults every configuration starts from.

use crate::config::{DEFAULT_HOST, DEFAULT_PORT};
use crate::selection::DEFAULT_HISTORY_LIMIT;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with defaults; later sources override key by key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", DEFAULT_HOST)?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("server.bridge_enabled", true)?
        .set_default("storage.history_limit", DEFAULT_HISTORY_LIMIT as i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.output", "stderr")
}
