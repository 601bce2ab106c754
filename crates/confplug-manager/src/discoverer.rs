//! Plugin discovery collaborators.
//!
//! A [`PluginDiscoverer`] fills a [`CategoryRegistry`] with instantiated
//! plugins. [`ManifestDiscoverer`] is the stock implementation: it finds
//! descriptor files on disk and instantiates each plugin through the factory
//! registered for its `module`.

use confplug_runtime::discovery::{discover_plugins, user_plugins_dir, DEFAULT_EXTENSION};
use confplug_runtime::{
    CategoryRegistry, Plugin, PluginError, PluginInfo, PluginResult, DEFAULT_CATEGORY,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of plugins for a [`CategoryRegistry`].
pub trait PluginDiscoverer: Send {
    /// Categories plugins are sorted into.
    fn categories(&self) -> Vec<String>;

    /// Register every plugin found into `registry`.
    ///
    /// Returns the number of plugins newly registered. Plugins already present
    /// in the registry are left alone, so collecting twice is harmless.
    fn collect(&mut self, registry: &mut CategoryRegistry) -> PluginResult<usize>;
}

/// Builds a plugin object from its descriptor info.
pub type PluginFactory = Arc<dyn Fn(&PluginInfo) -> PluginResult<Arc<dyn Plugin>> + Send + Sync>;

/// Factories keyed by descriptor `module`.
#[derive(Clone, Default)]
pub struct PluginFactories {
    factories: HashMap<String, PluginFactory>,
}

impl PluginFactories {
    /// Create an empty factory set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a module name, replacing any previous one.
    pub fn register<F>(&mut self, module: impl Into<String>, factory: F)
    where
        F: Fn(&PluginInfo) -> PluginResult<Arc<dyn Plugin>> + Send + Sync + 'static,
    {
        self.factories.insert(module.into(), Arc::new(factory));
    }

    /// Builder-style [`PluginFactories::register`].
    pub fn with<F>(mut self, module: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&PluginInfo) -> PluginResult<Arc<dyn Plugin>> + Send + Sync + 'static,
    {
        self.register(module, factory);
        self
    }

    /// Whether a factory exists for the module.
    pub fn contains(&self, module: &str) -> bool {
        self.factories.contains_key(module)
    }

    /// Registered module names, sorted.
    pub fn modules(&self) -> Vec<String> {
        let mut modules: Vec<String> = self.factories.keys().cloned().collect();
        modules.sort();
        modules
    }

    /// Instantiate the plugin described by `info`.
    pub fn create(&self, info: &PluginInfo) -> PluginResult<Arc<dyn Plugin>> {
        let factory = self
            .factories
            .get(&info.module)
            .ok_or_else(|| PluginError::UnknownModule(info.module.clone()))?;
        factory(info)
    }
}

impl std::fmt::Debug for PluginFactories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactories")
            .field("modules", &self.modules())
            .finish()
    }
}

/// Discovers plugins from `*.plugin.toml` descriptors.
#[derive(Debug)]
pub struct ManifestDiscoverer {
    dirs: Vec<PathBuf>,
    extension: String,
    categories: Vec<String>,
    factories: PluginFactories,
}

impl ManifestDiscoverer {
    /// Create a discoverer scanning the user plugins directory for the
    /// `Default` category.
    pub fn new(factories: PluginFactories) -> Self {
        Self {
            dirs: user_plugins_dir().into_iter().collect(),
            extension: DEFAULT_EXTENSION.to_string(),
            categories: vec![DEFAULT_CATEGORY.to_string()],
            factories,
        }
    }

    /// Scan these directories instead, in order.
    pub fn with_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Match descriptor files ending in `.<extension>`.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sort plugins into these categories. Descriptors naming any other
    /// category are skipped.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Directories scanned by this discoverer.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl PluginDiscoverer for ManifestDiscoverer {
    fn categories(&self) -> Vec<String> {
        self.categories.clone()
    }

    fn collect(&mut self, registry: &mut CategoryRegistry) -> PluginResult<usize> {
        let candidates = discover_plugins(&self.dirs, &self.extension)?;
        let mut loaded = 0;

        for candidate in candidates {
            let info = candidate.manifest.to_info(Some(&candidate.path));

            if !registry.has_category(&info.category) {
                warn!(
                    "Skipping plugin {}: category '{}' is not managed",
                    info.name, info.category
                );
                continue;
            }

            if registry.get(&info.category, &info.name).is_some() {
                debug!("Plugin {} ({}) already collected", info.name, info.category);
                continue;
            }

            let plugin = match self.factories.create(&info) {
                Ok(plugin) => plugin,
                Err(e) => {
                    warn!("Failed to load plugin {:?}: {}", candidate.path, e);
                    continue;
                }
            };

            if registry.register(info, plugin) {
                loaded += 1;
            }
        }

        info!("Loaded {} plugins", loaded);
        Ok(loaded)
    }
}
