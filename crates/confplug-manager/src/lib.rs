//! # confplug-manager
//!
//! Plugin activation synchronized with a configuration store.
//!
//! The [`ActivationCoordinator`] activates plugins by `(category, name)` and
//! records every activation in the category's activation list, so that the
//! next [`ActivationCoordinator::collect_and_activate_from_config`] brings
//! the same plugins back up. Each activated plugin also gets a
//! [`PluginOptions`] namespace for its own settings.
//!
//! ## Flushing
//!
//! The coordinator never writes to disk itself. It calls the
//! [`ChangeNotifier`] after every config mutation and the host decides what
//! to do with it:
//!
//! ```no_run
//! use confplug_manager::{ActivationCoordinator, ChangeNotifier, ManifestDiscoverer, PluginFactories};
//! use confplug_runtime::{SharedConfig, TomlConfigStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SharedConfig::new(TomlConfigStore::open("plugins.toml")?);
//! let flush_target = config.clone();
//! let notifier = ChangeNotifier::new(move || flush_target.flush().is_ok());
//!
//! let discoverer = ManifestDiscoverer::new(PluginFactories::new()).with_dirs(["plugins"]);
//! let mut coordinator = ActivationCoordinator::new(Box::new(discoverer), config, notifier);
//! coordinator.collect_and_activate_from_config()?;
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod discoverer;
pub mod notifier;
pub mod options;

pub use coordinator::{ActivationCoordinator, CollectReport};
pub use discoverer::{ManifestDiscoverer, PluginDiscoverer, PluginFactories, PluginFactory};
pub use notifier::ChangeNotifier;
pub use options::{ActivatedPlugin, PluginOptions};
