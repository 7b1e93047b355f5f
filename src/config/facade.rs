//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::AiworkConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project from files and environment.
    pub fn load(project_root: &Path) -> Result<AiworkConfig, ConfigError> {
        MergeService::load(project_root)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<AiworkConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> AiworkConfig {
        AiworkConfig::default()
    }
}
