//! Category registry for discovered plugins.
//!
//! Maps each category to the plugins discovered in it, in discovery order.
//! Categories are declared up-front so that an empty category is still known.

use crate::error::{PluginError, PluginResult};
use crate::plugin::{Plugin, PluginInfo};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A plugin object together with its descriptive info.
#[derive(Clone)]
pub struct RegisteredPlugin {
    pub info: PluginInfo,
    pub plugin: Arc<dyn Plugin>,
}

impl RegisteredPlugin {
    pub fn new(info: PluginInfo, plugin: Arc<dyn Plugin>) -> Self {
        Self { info, plugin }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn category(&self) -> &str {
        &self.info.category
    }
}

impl std::fmt::Debug for RegisteredPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPlugin")
            .field("info", &self.info)
            .field("state", &self.plugin.state())
            .finish()
    }
}

/// In-memory mapping from category name to its plugins.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    categories: IndexMap<String, Vec<RegisteredPlugin>>,
}

impl CategoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that already knows the given categories.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for category in categories {
            registry.add_category(category);
        }
        registry
    }

    /// Declare a category. Declaring it again is a no-op.
    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.entry(category.into()).or_default();
    }

    /// Whether the category is known.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Add a plugin to its category.
    ///
    /// Returns `false` if the category is unknown or the name is already taken
    /// within it; the registry is left untouched in both cases.
    pub fn register(&mut self, info: PluginInfo, plugin: Arc<dyn Plugin>) -> bool {
        let Some(plugins) = self.categories.get_mut(&info.category) else {
            warn!(
                "Ignoring plugin {}: unknown category '{}'",
                info.name, info.category
            );
            return false;
        };

        if plugins.iter().any(|p| p.info.name == info.name) {
            warn!(
                "Plugin {} is already registered in category '{}'",
                info.name, info.category
            );
            return false;
        }

        debug!("Registered plugin: {} ({})", info.name, info.category);
        plugins.push(RegisteredPlugin::new(info, plugin));
        true
    }

    /// Look up a plugin by category and name.
    pub fn get(&self, category: &str, name: &str) -> Option<&RegisteredPlugin> {
        self.categories
            .get(category)?
            .iter()
            .find(|p| p.info.name == name)
    }

    /// Look up a plugin, failing with `PluginNotFound`.
    pub fn require(&self, category: &str, name: &str) -> PluginResult<&RegisteredPlugin> {
        self.get(category, name)
            .ok_or_else(|| PluginError::PluginNotFound {
                category: category.to_string(),
                name: name.to_string(),
            })
    }

    /// All known category names, in declaration order.
    pub fn categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Plugins of one category, in discovery order.
    pub fn plugins_of_category(&self, category: &str) -> PluginResult<&[RegisteredPlugin]> {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .ok_or_else(|| PluginError::CategoryNotFound(category.to_string()))
    }

    /// Every registered plugin, category by category.
    pub fn all_plugins(&self) -> impl Iterator<Item = &RegisteredPlugin> {
        self.categories.values().flatten()
    }

    /// Total number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}
