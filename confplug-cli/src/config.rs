//! Settings file loading and management
//!
//! This module handles loading and parsing the CLI settings from
//! `$XDG_CONFIG_HOME/confplug/settings.toml`. If the settings file doesn't
//! exist, a default file is created with documented comments.
//!
//! The settings describe *where* plugins and their configuration live; the
//! plugin configuration itself (activation lists, plugin options) is kept in
//! a separate file managed by the coordinator.

use anyhow::{Context, Result};
use confplug_runtime::{validate_plugin_name, DEFAULT_CATEGORY, DEFAULT_EXTENSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main CLI settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "warn"
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Plugin discovery settings
    #[serde(default)]
    pub plugins: PluginSettings,
    /// Plugin configuration file settings
    #[serde(default)]
    pub config: ConfigFileSettings,
}

/// Plugin discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginSettings {
    /// Directories scanned for descriptors, in priority order
    /// If empty, uses XDG_DATA_HOME/confplug/plugins
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
    /// Descriptor file extension
    /// Default: "plugin.toml"
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Categories plugins are sorted into
    /// Default: ["Default"]
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

/// Plugin configuration file settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFileSettings {
    /// Path to the plugin configuration file
    /// If None, uses XDG_CONFIG_HOME/confplug/plugins.toml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_categories() -> Vec<String> {
    vec![DEFAULT_CATEGORY.to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            plugins: PluginSettings::default(),
            config: ConfigFileSettings::default(),
        }
    }
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            extension: default_extension(),
            categories: default_categories(),
        }
    }
}

impl Settings {
    /// Load settings from the specified path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default XDG config location
    ///
    /// If the settings file doesn't exist, creates a default one with
    /// documented comments.
    pub fn load_default() -> Result<Self> {
        let settings_path = Self::default_settings_path()?;

        if !settings_path.exists() {
            Self::create_default_file(&settings_path)?;
        }

        Self::load(&settings_path)
    }

    /// Get the default settings file path
    ///
    /// Returns `$XDG_CONFIG_HOME/confplug/settings.toml`
    pub fn default_settings_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("settings.toml"))
    }

    /// Create a default settings file with documented comments
    fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_settings_content()).with_context(|| {
            format!("Failed to write default settings file: {}", path.display())
        })?;

        tracing::info!("Created default settings file at: {}", path.display());
        Ok(())
    }

    /// Generate the default settings file content with comments
    fn default_settings_content() -> String {
        r#"# confplug settings

# Log level: trace, debug, info, warn, error
# Default: "warn"
log_level = "warn"

[plugins]
# Directories scanned for plugin descriptors, highest priority first.
# If empty, defaults to $XDG_DATA_HOME/confplug/plugins
dirs = []

# Descriptor file extension
# Default: "plugin.toml"
extension = "plugin.toml"

# Categories plugins are sorted into. Descriptors naming any other
# category are ignored.
categories = ["Default"]

[config]
# File holding activation lists and plugin options.
# If not specified, defaults to $XDG_CONFIG_HOME/confplug/plugins.toml
# path = "/path/to/plugins.toml"
"#
        .to_string()
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            );
        }

        if self.plugins.extension.trim_start_matches('.').is_empty() {
            anyhow::bail!("plugins.extension cannot be empty");
        }

        if self.plugins.categories.is_empty() {
            anyhow::bail!("plugins.categories must name at least one category");
        }

        for category in &self.plugins.categories {
            validate_plugin_name(category)
                .with_context(|| format!("Invalid category name: '{}'", category))?;
        }

        Ok(())
    }

    /// Get the plugin configuration file path
    pub fn config_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.config.path {
            return Ok(path.clone());
        }

        Ok(project_dirs()?.config_dir().join("plugins.toml"))
    }

    /// Get the plugin directories to scan
    pub fn plugin_dirs(&self) -> Result<Vec<PathBuf>> {
        if !self.plugins.dirs.is_empty() {
            return Ok(self.plugins.dirs.clone());
        }

        Ok(vec![project_dirs()?.data_dir().join("plugins")])
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "confplug")
        .context("Failed to determine project directories")
}
