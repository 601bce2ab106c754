//! # confplug-runtime
//!
//! Building blocks for the confplug plugin manager.
//!
//! This crate provides:
//! - Plugin descriptor parsing and discovery from plugin directories
//! - The `Plugin` lifecycle trait
//! - The in-memory `CategoryRegistry` of discovered plugins
//! - The `ConfigStore` abstraction with in-memory and TOML-backed stores
//! - The config key encoding shared by every confplug component
//!
//! ## Plugin Descriptors
//!
//! Every plugin is described by a `<name>.plugin.toml` file:
//!
//! ```toml
//! [plugin]
//! name = "Echo"
//! module = "echo"
//! category = "Default"
//! ```
//!
//! The `module` names a factory compiled into the host; descriptors never
//! carry code.

pub mod config;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod plugin;
pub mod registry;

pub use config::{
    ConfigError, ConfigResult, ConfigStore, MemoryConfigStore, SharedConfig, TomlConfigStore,
};
pub use discovery::{
    discover_in_directory, discover_plugins, user_plugins_dir, PluginCandidate, DEFAULT_EXTENSION,
};
pub use error::{PluginError, PluginResult};
pub use manifest::{PluginManifest, PluginMetadata};
pub use naming::{
    activation_list_option, decode_plugin_list, encode_plugin_list, plugin_section,
    validate_plugin_name, CONFIG_SECTION_NAME, DEFAULT_CATEGORY, PLUGIN_NAME_FORBIDDEN_STRING,
};
pub use plugin::{ActivationFlag, Plugin, PluginInfo, PluginState};
pub use registry::{CategoryRegistry, RegisteredPlugin};
