//! Plugin descriptor parsing.
//!
//! Each plugin is described by a `*.plugin.toml` file that names the plugin,
//! its category and the factory module used to instantiate it.

use crate::error::{PluginError, PluginResult};
use crate::naming::{validate_plugin_name, DEFAULT_CATEGORY};
use crate::plugin::PluginInfo;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Plugin descriptor structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin metadata.
    pub plugin: PluginMetadata,
}

/// Plugin metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Name, unique within the category.
    pub name: String,

    /// Factory key used to instantiate the plugin.
    pub module: String,

    /// Category the plugin belongs to.
    #[serde(default = "default_category")]
    pub category: String,

    /// Version string.
    #[serde(default)]
    pub version: Option<String>,

    /// Plugin description.
    #[serde(default)]
    pub description: Option<String>,

    /// Plugin author.
    #[serde(default)]
    pub author: Option<String>,

    /// Homepage URL.
    #[serde(default)]
    pub website: Option<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl PluginManifest {
    /// Load a descriptor from a TOML file.
    pub fn from_file(path: &Path) -> PluginResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a descriptor from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> PluginResult<Self> {
        let manifest: PluginManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the descriptor.
    fn validate(&self) -> PluginResult<()> {
        validate_plugin_name(&self.plugin.name)?;

        if self.plugin.module.is_empty() {
            return Err(PluginError::InvalidManifest(format!(
                "Plugin '{}' has an empty module",
                self.plugin.name
            )));
        }

        if self.plugin.category.is_empty() {
            return Err(PluginError::InvalidManifest(format!(
                "Plugin '{}' has an empty category",
                self.plugin.name
            )));
        }

        Ok(())
    }

    /// Build the registry info for this descriptor.
    pub fn to_info(&self, path: Option<&Path>) -> PluginInfo {
        PluginInfo {
            name: self.plugin.name.clone(),
            category: self.plugin.category.clone(),
            module: self.plugin.module.clone(),
            version: self.plugin.version.clone(),
            description: self.plugin.description.clone(),
            author: self.plugin.author.clone(),
            website: self.plugin.website.clone(),
            path: path.map(Path::to_path_buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let toml = r#"
[plugin]
name = "Echo"
module = "echo"
category = "Text Filters"
version = "0.1.0"
description = "Repeats its input"
author = "confplug"
"#;

        let manifest = PluginManifest::from_str(toml).unwrap();
        assert_eq!(manifest.plugin.name, "Echo");
        assert_eq!(manifest.plugin.module, "echo");
        assert_eq!(manifest.plugin.category, "Text Filters");
        assert_eq!(manifest.plugin.version.as_deref(), Some("0.1.0"));

        let info = manifest.to_info(None);
        assert_eq!(info.category, "Text Filters");
        assert!(info.path.is_none());
    }

    #[test]
    fn test_default_category() {
        let toml = r#"
[plugin]
name = "Echo"
module = "echo"
"#;

        let manifest = PluginManifest::from_str(toml).unwrap();
        assert_eq!(manifest.plugin.category, "Default");
    }

    #[test]
    fn test_forbidden_name_rejected() {
        let toml = r#"
[plugin]
name = "a;;b"
module = "echo"
"#;

        let result = PluginManifest::from_str(toml);
        assert!(matches!(result, Err(PluginError::InvalidPluginName(_))));
    }

    #[test]
    fn test_missing_module_rejected() {
        let toml = r#"
[plugin]
name = "Echo"
"#;

        assert!(PluginManifest::from_str(toml).is_err());
    }
}
