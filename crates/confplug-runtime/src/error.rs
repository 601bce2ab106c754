//! Error types for the confplug runtime.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while discovering, activating or configuring plugins.
#[derive(Error, Debug)]
pub enum PluginError {
    /// No plugin with this name was discovered in the category.
    #[error("Plugin not found: {name} (category {category})")]
    PluginNotFound { category: String, name: String },

    /// The category is not known to the registry.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// A plugin option was never registered.
    #[error("Option '{option}' not found in section '{section}'")]
    OptionNotFound { section: String, option: String },

    /// The plugin's activation completed but left it inactive.
    #[error("Plugin {name} (category {category}) did not activate")]
    NotActivated { category: String, name: String },

    /// The plugin's own lifecycle reported an error.
    #[error("Plugin {name} (category {category}) failed: {reason}")]
    ActivationFailed {
        category: String,
        name: String,
        reason: String,
    },

    /// Failed to parse a plugin descriptor.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Plugin name contains the reserved list delimiter.
    #[error("Invalid plugin name: {0}")]
    InvalidPluginName(String),

    /// Descriptor refers to a module no factory was registered for.
    #[error("Unknown plugin module: {0}")]
    UnknownModule(String),

    /// Error raised by the configuration store.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PluginError {
    /// Whether this error means "nothing to activate or read here".
    ///
    /// Partial activation counts as not found: the plugin is neither
    /// persisted nor decorated.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PluginError::PluginNotFound { .. }
                | PluginError::CategoryNotFound(_)
                | PluginError::OptionNotFound { .. }
                | PluginError::NotActivated { .. }
        )
    }
}

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing = PluginError::PluginNotFound {
            category: "Default".to_string(),
            name: "x".to_string(),
        };
        assert!(missing.is_not_found());

        let partial = PluginError::NotActivated {
            category: "Default".to_string(),
            name: "x".to_string(),
        };
        assert!(partial.is_not_found());

        let backend = PluginError::Config(ConfigError::Poisoned);
        assert!(!backend.is_not_found());
    }
}
