//! Activation coordinator.
//!
//! The coordinator is the single place where plugins get activated *and* the
//! activation is recorded. A plugin activated through its own
//! [`Plugin::activate`](confplug_runtime::Plugin::activate) is not persisted;
//! only [`ActivationCoordinator::activate_by_name`] keeps the category's
//! activation list in sync.
//!
//! Activation lists are stored in the `"Plugin Management"` section:
//!
//! ```toml
//! ["Plugin Management"]
//! Default_plugins_to_load = "Echo;;Counter"
//! Text_Filters_plugins_to_load = "Upper Case"
//! ```
//!
//! Re-activating a listed plugin does not add a second entry.

use crate::discoverer::PluginDiscoverer;
use crate::notifier::ChangeNotifier;
use crate::options::{self, ActivatedPlugin, PluginOptions};
use confplug_runtime::{
    activation_list_option, decode_plugin_list, encode_plugin_list, CategoryRegistry,
    ConfigResult, PluginError, PluginResult, RegisteredPlugin, SharedConfig, CONFIG_SECTION_NAME,
};
use tracing::{debug, info, warn};

/// Outcome of [`ActivationCoordinator::collect_and_activate_from_config`].
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Plugins newly registered by the discovery pass.
    pub discovered: usize,

    /// Plugins activated from the activation lists, in list order.
    pub activated: Vec<ActivatedPlugin>,

    /// `(category, name)` entries that were listed but could not be
    /// activated, because they were never discovered or did not come up.
    pub skipped: Vec<(String, String)>,
}

/// Activates plugins and keeps the config store in sync with activations.
pub struct ActivationCoordinator {
    registry: CategoryRegistry,
    discoverer: Box<dyn PluginDiscoverer>,
    config: SharedConfig,
    notifier: ChangeNotifier,
}

impl ActivationCoordinator {
    /// Create a coordinator. Nothing is discovered until
    /// [`collect_plugins`](Self::collect_plugins) or
    /// [`collect_and_activate_from_config`](Self::collect_and_activate_from_config)
    /// is called.
    pub fn new(
        discoverer: Box<dyn PluginDiscoverer>,
        config: SharedConfig,
        notifier: ChangeNotifier,
    ) -> Self {
        let registry = CategoryRegistry::with_categories(discoverer.categories());
        Self {
            registry,
            discoverer,
            config,
            notifier,
        }
    }

    /// Create a coordinator with the no-op notifier.
    pub fn with_config(discoverer: Box<dyn PluginDiscoverer>, config: SharedConfig) -> Self {
        Self::new(discoverer, config, ChangeNotifier::default())
    }

    /// Replace the change notifier.
    ///
    /// Option namespaces handed out earlier keep the notifier they were
    /// created with.
    pub fn set_notifier(&mut self, notifier: ChangeNotifier) {
        self.notifier = notifier;
    }

    /// The shared config store.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The registry of discovered plugins.
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Run a discovery pass without activating anything.
    pub fn collect_plugins(&mut self) -> PluginResult<usize> {
        info!("Collecting plugins...");
        self.discoverer.collect(&mut self.registry)
    }

    /// Run a discovery pass, then activate every plugin listed in the
    /// config, category by category, in list order.
    ///
    /// Listed plugins that were not discovered, or that fail to come up, are
    /// skipped with a warning so that a stale config never blocks startup.
    /// Any other error is returned.
    pub fn collect_and_activate_from_config(&mut self) -> PluginResult<CollectReport> {
        let mut report = CollectReport {
            discovered: self.collect_plugins()?,
            ..CollectReport::default()
        };

        for category in self.registry.categories() {
            for name in self.activated_names(&category)? {
                match self.activate_by_name(&category, &name) {
                    Ok(plugin) => report.activated.push(plugin),
                    Err(e) if e.is_not_found() => {
                        warn!("Skipping configured plugin {} ({}): {}", name, category, e);
                        report.skipped.push((category.clone(), name));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            "Activated {} plugins from config ({} skipped)",
            report.activated.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    // ========================================================================
    // Activation
    // ========================================================================

    /// Activate a plugin and record it in its category's activation list.
    ///
    /// Fails with `PluginNotFound` if the plugin was never discovered, and
    /// with `NotActivated` if it does not report itself active afterwards.
    /// The config is untouched in both cases.
    pub fn activate_by_name(&self, category: &str, name: &str) -> PluginResult<ActivatedPlugin> {
        let entry = self.registry.require(category, name)?.clone();

        entry.plugin.activate()?;
        if !entry.plugin.is_activated() {
            warn!("Plugin {} ({}) did not activate", name, category);
            return Err(PluginError::NotActivated {
                category: category.to_string(),
                name: name.to_string(),
            });
        }

        if self.add_to_activation_list(category, name)? {
            self.notifier.notify();
        }

        info!("Activated plugin: {} ({})", name, category);
        Ok(self.decorate(entry))
    }

    /// Deactivate a plugin and remove it from its category's activation list.
    pub fn deactivate_by_name(&self, category: &str, name: &str) -> PluginResult<()> {
        let entry = self.registry.require(category, name)?;

        entry.plugin.deactivate()?;

        if self.remove_from_activation_list(category, name)? {
            self.notifier.notify();
        }

        info!("Deactivated plugin: {} ({})", name, category);
        Ok(())
    }

    /// Names recorded in a category's activation list, in order.
    ///
    /// Empty if the category has no list yet.
    pub fn activated_names(&self, category: &str) -> PluginResult<Vec<String>> {
        let option = activation_list_option(category);

        let value = self.config.with(|store| -> ConfigResult<Option<String>> {
            if !store.has_option(CONFIG_SECTION_NAME, &option) {
                return Ok(None);
            }
            store.get(CONFIG_SECTION_NAME, &option).map(Some)
        })??;

        Ok(value.map(|v| decode_plugin_list(&v)).unwrap_or_default())
    }

    fn add_to_activation_list(&self, category: &str, name: &str) -> PluginResult<bool> {
        let option = activation_list_option(category);

        let changed = self.config.with(|store| -> ConfigResult<bool> {
            if !store.has_section(CONFIG_SECTION_NAME) {
                store.add_section(CONFIG_SECTION_NAME)?;
            }

            let mut names = if store.has_option(CONFIG_SECTION_NAME, &option) {
                decode_plugin_list(&store.get(CONFIG_SECTION_NAME, &option)?)
            } else {
                Vec::new()
            };

            if names.iter().any(|n| n == name) {
                return Ok(false);
            }

            names.push(name.to_string());
            store.set(CONFIG_SECTION_NAME, &option, &encode_plugin_list(&names))?;
            Ok(true)
        })??;

        if changed {
            debug!(option = %option, plugin = %name, "Appended to activation list");
        }
        Ok(changed)
    }

    fn remove_from_activation_list(&self, category: &str, name: &str) -> PluginResult<bool> {
        let option = activation_list_option(category);

        let changed = self.config.with(|store| -> ConfigResult<bool> {
            if !store.has_option(CONFIG_SECTION_NAME, &option) {
                return Ok(false);
            }

            let names = decode_plugin_list(&store.get(CONFIG_SECTION_NAME, &option)?);
            let remaining: Vec<&String> = names.iter().filter(|n| *n != name).collect();
            if remaining.len() == names.len() {
                return Ok(false);
            }

            store.set(CONFIG_SECTION_NAME, &option, &encode_plugin_list(remaining))?;
            Ok(true)
        })??;

        if changed {
            debug!(option = %option, plugin = %name, "Removed from activation list");
        }
        Ok(changed)
    }

    fn decorate(&self, entry: RegisteredPlugin) -> ActivatedPlugin {
        let options = PluginOptions::new(
            self.config.clone(),
            self.notifier.clone(),
            entry.category(),
            entry.name(),
        );
        ActivatedPlugin::new(entry, options)
    }

    // ========================================================================
    // Plugin options
    // ========================================================================

    /// Store an option in a plugin's section and notify the host.
    pub fn register_option(
        &self,
        category: &str,
        name: &str,
        key: &str,
        value: &str,
    ) -> PluginResult<()> {
        options::write_option(&self.config, &self.notifier, category, name, key, value)
    }

    /// Whether a plugin's section holds the option.
    pub fn has_option(&self, category: &str, name: &str, key: &str) -> PluginResult<bool> {
        options::has_option(&self.config, category, name, key)
    }

    /// Read an option from a plugin's section.
    pub fn read_option(&self, category: &str, name: &str, key: &str) -> PluginResult<String> {
        options::read_option(&self.config, category, name, key)
    }

    /// Option namespace of a discovered plugin, whether or not it is active.
    pub fn options_for(&self, category: &str, name: &str) -> PluginResult<PluginOptions> {
        let entry = self.registry.require(category, name)?;
        Ok(PluginOptions::new(
            self.config.clone(),
            self.notifier.clone(),
            entry.category(),
            entry.name(),
        ))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Known category names.
    pub fn categories(&self) -> Vec<String> {
        self.registry.categories()
    }

    /// Plugins discovered in a category.
    pub fn plugins_of_category(&self, category: &str) -> PluginResult<&[RegisteredPlugin]> {
        self.registry.plugins_of_category(category)
    }

    /// Look up a discovered plugin.
    pub fn plugin(&self, category: &str, name: &str) -> Option<&RegisteredPlugin> {
        self.registry.get(category, name)
    }

    /// Every discovered plugin.
    pub fn all_plugins(&self) -> impl Iterator<Item = &RegisteredPlugin> {
        self.registry.all_plugins()
    }
}

impl std::fmt::Debug for ActivationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationCoordinator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
