//! MergeService: orchestrates sources, applies merge policy, deserializes to AiworkConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::AiworkConfig;
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a project.
    /// Precedence: defaults (lowest) -> global file -> project file -> environment (highest).
    pub fn load(project_root: &Path) -> Result<AiworkConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, project_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config: AiworkConfig = builder.build()?.try_deserialize()?;
        debug!(
            project_root = %project_root.display(),
            port = config.server.port,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load config from a specific file with environment overlay. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<AiworkConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
