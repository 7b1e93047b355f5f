//! Project file source: `<project>/.aiwork/server.toml`, optional.

use crate::workspace::WorkspacePaths;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    project_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = WorkspacePaths::new(project_root).server_config_file();
    Ok(builder.add_source(File::from(path).required(false)))
}
