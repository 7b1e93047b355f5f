//! Built-in default rule files and component maps.
//!
//! Shipped copies are embedded in the binary. When `defaults_dir` is configured the
//! files are read from that directory instead, with the same relative layout:
//!
//! ```text
//! code-rules.md
//! tech-design-rules.md
//! framework-rules/<framework>.md
//! component-maps/<framework>.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

const CODE_RULES: &str = "code-rules.md";
const TECH_DESIGN_RULES: &str = "tech-design-rules.md";
const FRAMEWORK_RULES_DIR: &str = "framework-rules";
const COMPONENT_MAPS_DIR: &str = "component-maps";

const EMBEDDED: &[(&str, &str)] = &[
    (CODE_RULES, include_str!("../../defaults/code-rules.md")),
    (
        TECH_DESIGN_RULES,
        include_str!("../../defaults/tech-design-rules.md"),
    ),
    (
        "framework-rules/react-native.md",
        include_str!("../../defaults/framework-rules/react-native.md"),
    ),
    (
        "component-maps/react-native.json",
        include_str!("../../defaults/component-maps/react-native.json"),
    ),
    (
        "component-maps/react.json",
        include_str!("../../defaults/component-maps/react.json"),
    ),
];

/// A default file's content and a display label for where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultFile {
    pub content: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defaults {
    Embedded,
    Directory(PathBuf),
}

impl Defaults {
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Defaults::Directory(dir.to_path_buf()),
            None => Defaults::Embedded,
        }
    }

    fn get(&self, relative: &str) -> Option<DefaultFile> {
        match self {
            Defaults::Embedded => EMBEDDED
                .iter()
                .find(|(name, _)| *name == relative)
                .map(|(name, content)| DefaultFile {
                    content: (*content).to_string(),
                    source: format!("builtin:{}", name),
                }),
            Defaults::Directory(dir) => {
                let path = dir.join(relative);
                match fs::read_to_string(&path) {
                    Ok(content) => Some(DefaultFile {
                        content,
                        source: path.display().to_string(),
                    }),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to read default file");
                        None
                    }
                }
            }
        }
    }

    pub fn code_rules(&self) -> Option<DefaultFile> {
        self.get(CODE_RULES)
    }

    pub fn tech_design_rules(&self) -> Option<DefaultFile> {
        self.get(TECH_DESIGN_RULES)
    }

    pub fn framework_rules(&self, framework: &str) -> Option<DefaultFile> {
        self.get(&format!("{}/{}.md", FRAMEWORK_RULES_DIR, framework))
    }

    pub fn component_map(&self, framework: &str) -> Option<DefaultFile> {
        self.get(&format!("{}/{}.json", COMPONENT_MAPS_DIR, framework))
    }

    /// Frameworks that have a component map, sorted.
    pub fn component_map_frameworks(&self) -> Vec<String> {
        let mut frameworks: Vec<String> = match self {
            Defaults::Embedded => EMBEDDED
                .iter()
                .filter_map(|(name, _)| name.strip_prefix("component-maps/"))
                .filter_map(|name| name.strip_suffix(".json"))
                .map(str::to_string)
                .collect(),
            Defaults::Directory(dir) => WalkDir::new(dir.join(COMPONENT_MAPS_DIR))
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| {
                    e.file_name()
                        .to_str()
                        .and_then(|n| n.strip_suffix(".json"))
                        .map(str::to_string)
                })
                .collect(),
        };
        frameworks.sort();
        frameworks
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults::Embedded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults_present() {
        let defaults = Defaults::Embedded;
        assert!(defaults.code_rules().is_some());
        assert!(defaults.tech_design_rules().is_some());
        assert!(defaults.framework_rules("react-native").is_some());
        assert!(defaults.framework_rules("flutter").is_none());
        assert_eq!(
            defaults.component_map_frameworks(),
            vec!["react".to_string(), "react-native".to_string()]
        );
    }

    #[test]
    fn test_directory_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("component-maps")).unwrap();
        fs::write(temp.path().join("code-rules.md"), "# Custom").unwrap();
        fs::write(temp.path().join("component-maps/vue.json"), "{}").unwrap();
        fs::write(temp.path().join("component-maps/notes.txt"), "").unwrap();

        let defaults = Defaults::from_dir(Some(temp.path()));
        let rules = defaults.code_rules().unwrap();
        assert_eq!(rules.content, "# Custom");
        assert!(rules.source.ends_with("code-rules.md"));
        assert!(defaults.tech_design_rules().is_none());
        assert_eq!(defaults.component_map_frameworks(), vec!["vue".to_string()]);
    }
}
