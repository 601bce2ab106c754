//! Per-plugin option namespace.
//!
//! Options of plugin `name` in `category` live in the config section
//! `"<category> plugin: <name>"`. [`PluginOptions`] binds that identity once
//! so a plugin can read and write its settings without knowing the naming
//! scheme.

use crate::notifier::ChangeNotifier;
use confplug_runtime::{
    plugin_section, ConfigError, Plugin, PluginError, PluginInfo, PluginResult, RegisteredPlugin,
    SharedConfig,
};
use std::sync::Arc;
use tracing::debug;

/// Write an option into a plugin's section, creating the section if needed.
pub(crate) fn write_option(
    config: &SharedConfig,
    notifier: &ChangeNotifier,
    category: &str,
    name: &str,
    key: &str,
    value: &str,
) -> PluginResult<()> {
    let section = plugin_section(category, name);

    config.with(|store| -> Result<(), ConfigError> {
        if !store.has_section(&section) {
            store.add_section(&section)?;
        }
        store.set(&section, key, value)
    })??;

    debug!(section = %section, option = %key, "Registered plugin option");
    notifier.notify();
    Ok(())
}

/// Read an option from a plugin's section.
pub(crate) fn read_option(
    config: &SharedConfig,
    category: &str,
    name: &str,
    key: &str,
) -> PluginResult<String> {
    let section = plugin_section(category, name);

    config.with(|store| {
        if !store.has_option(&section, key) {
            return Err(PluginError::OptionNotFound {
                section: section.clone(),
                option: key.to_string(),
            });
        }
        Ok(store.get(&section, key)?)
    })?
}

/// Whether a plugin's section holds the option.
pub(crate) fn has_option(
    config: &SharedConfig,
    category: &str,
    name: &str,
    key: &str,
) -> PluginResult<bool> {
    let section = plugin_section(category, name);
    Ok(config.with(|store| store.has_section(&section) && store.has_option(&section, key))?)
}

/// Option accessors bound to one plugin's identity.
#[derive(Debug, Clone)]
pub struct PluginOptions {
    config: SharedConfig,
    notifier: ChangeNotifier,
    category: String,
    name: String,
}

impl PluginOptions {
    pub(crate) fn new(
        config: SharedConfig,
        notifier: ChangeNotifier,
        category: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            config,
            notifier,
            category: category.into(),
            name: name.into(),
        }
    }

    /// Config section this namespace writes to.
    pub fn section(&self) -> String {
        plugin_section(&self.category, &self.name)
    }

    /// Store an option value and notify the host.
    pub fn set_config_option(&self, key: &str, value: &str) -> PluginResult<()> {
        write_option(
            &self.config,
            &self.notifier,
            &self.category,
            &self.name,
            key,
            value,
        )
    }

    /// Read an option value. Fails with `OptionNotFound` if it was never set.
    pub fn get_config_option(&self, key: &str) -> PluginResult<String> {
        read_option(&self.config, &self.category, &self.name, key)
    }

    /// Whether the option has been set.
    pub fn has_config_option(&self, key: &str) -> PluginResult<bool> {
        has_option(&self.config, &self.category, &self.name, key)
    }
}

/// A plugin activated through the coordinator, with its option namespace.
#[derive(Debug, Clone)]
pub struct ActivatedPlugin {
    entry: RegisteredPlugin,
    options: PluginOptions,
}

impl ActivatedPlugin {
    pub(crate) fn new(entry: RegisteredPlugin, options: PluginOptions) -> Self {
        Self { entry, options }
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }

    pub fn category(&self) -> &str {
        self.entry.category()
    }

    pub fn info(&self) -> &PluginInfo {
        &self.entry.info
    }

    /// The underlying plugin object.
    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.entry.plugin
    }

    /// The plugin's option namespace.
    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn set_config_option(&self, key: &str, value: &str) -> PluginResult<()> {
        self.options.set_config_option(key, value)
    }

    pub fn get_config_option(&self, key: &str) -> PluginResult<String> {
        self.options.get_config_option(key)
    }

    pub fn has_config_option(&self, key: &str) -> PluginResult<bool> {
        self.options.has_config_option(key)
    }
}
