//! Rule layers and component maps.
//!
//! Code rules merge up to three layers, lowest priority first: the base rules, the
//! framework rules, and the project's `.aiwork/figma-rules.md`. The project layer is
//! appended last under its own heading so the assistant reads it as the override.

use crate::error::{ApiError, StorageError};
use crate::workspace::defaults::DefaultFile;
use crate::workspace::facade::Workspace;
use crate::workspace::types::{CodeRules, ComponentMap, RuleLayers};
use std::fs;
use std::path::Path;
use tracing::debug;

fn read_project_file(path: &Path) -> Result<Option<DefaultFile>, ApiError> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(DefaultFile {
            content,
            source: path.display().to_string(),
        })),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::at(path, e).into()),
    }
}

impl Workspace {
    /// Merged code generation rules for `framework` (or the configured framework).
    pub fn code_rules(&self, framework: Option<&str>) -> Result<CodeRules, ApiError> {
        let framework = self.resolve_framework(framework);
        let base = self.defaults().code_rules();
        let framework_layer = self.defaults().framework_rules(&framework);
        let project = read_project_file(&self.paths().figma_rules_file())?;

        if base.is_none() && framework_layer.is_none() && project.is_none() {
            return Err(ApiError::RulesNotFound);
        }

        let mut sections: Vec<String> = Vec::new();
        if let Some(base) = &base {
            sections.push(base.content.trim_end().to_string());
        }
        if let Some(layer) = &framework_layer {
            sections.push(layer.content.trim_end().to_string());
        }
        if let Some(project) = &project {
            sections.push(format!(
                "# Project Rules\n\n> From {}; these take precedence over the rules above.\n\n{}",
                project.source,
                project.content.trim_end()
            ));
        }

        debug!(
            framework = %framework,
            base = base.is_some(),
            framework_layer = framework_layer.is_some(),
            project = project.is_some(),
            "Merged code rules"
        );

        Ok(CodeRules {
            rules: sections.join("\n\n---\n\n"),
            framework,
            layers: RuleLayers {
                base: base.map(|f| f.source),
                framework: framework_layer.map(|f| f.source),
                project: project.map(|f| f.source),
            },
        })
    }

    /// Tech design template: the project's copy wins over the default.
    pub fn tech_design_rules(&self) -> Result<DefaultFile, ApiError> {
        if let Some(project) = read_project_file(&self.paths().tech_rules_file())? {
            return Ok(project);
        }
        self.defaults()
            .tech_design_rules()
            .ok_or(ApiError::TechRulesNotFound)
    }

    /// Component map for `framework` (or the configured framework).
    pub fn component_map(
        &self,
        framework: Option<&str>,
    ) -> Result<(String, ComponentMap, String), ApiError> {
        let framework = self.resolve_framework(framework);
        let file = self
            .defaults()
            .component_map(&framework)
            .ok_or_else(|| ApiError::ComponentMapNotFound {
                framework: framework.clone(),
                available: self.defaults().component_map_frameworks(),
            })?;

        let map: ComponentMap = serde_json::from_str(&file.content).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to parse component map {}: {}",
                file.source, e
            ))
        })?;
        Ok((framework, map, file.source))
    }
}
