//! Section/option configuration store.
//!
//! A store maps section names to an ordered mapping of option names to
//! string values, in the spirit of INI files. confplug only ever touches the
//! `"Plugin Management"` section and the `"<category> plugin: <name>"`
//! sections; every other section belongs to the host application.

mod memory;
mod toml_store;

pub use memory::MemoryConfigStore;
pub use toml_store::TomlConfigStore;

use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised by a configuration store.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The section does not exist.
    #[error("No section: '{0}'")]
    NoSection(String),

    /// The option does not exist in the section.
    #[error("No option '{option}' in section '{section}'")]
    NoOption { section: String, option: String },

    /// The section already exists.
    #[error("Section '{0}' already exists")]
    DuplicateSection(String),

    /// A previous holder of the store panicked.
    #[error("Config store lock poisoned")]
    Poisoned,

    /// The backing document could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// The store could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for config store operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// A section/option key-value store.
pub trait ConfigStore: Send {
    /// Check if a section exists.
    fn has_section(&self, section: &str) -> bool;

    /// Create a section. Fails with `DuplicateSection` if it exists.
    fn add_section(&mut self, section: &str) -> ConfigResult<()>;

    /// Check if an option exists. False when the section is missing.
    fn has_option(&self, section: &str, option: &str) -> bool;

    /// Read an option value.
    fn get(&self, section: &str, option: &str) -> ConfigResult<String>;

    /// Write an option value. Fails with `NoSection` if the section is missing.
    fn set(&mut self, section: &str, option: &str, value: &str) -> ConfigResult<()>;

    /// Remove an option, returning whether it existed.
    fn remove_option(&mut self, section: &str, option: &str) -> ConfigResult<bool>;

    /// Remove a section and all its options, returning whether it existed.
    fn remove_section(&mut self, section: &str) -> bool;

    /// All section names, in insertion order.
    fn sections(&self) -> Vec<String>;

    /// Option names of a section, in insertion order.
    fn options(&self, section: &str) -> ConfigResult<Vec<String>>;

    /// Persist pending changes to durable storage.
    fn flush(&mut self) -> ConfigResult<()> {
        Ok(())
    }
}

/// A config store shared between the coordinator, plugin option namespaces
/// and the host.
///
/// The lock is only held for the duration of a single [`SharedConfig::with`]
/// call, never across a change notification.
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<Mutex<Box<dyn ConfigStore>>>,
}

impl SharedConfig {
    /// Wrap a store for sharing.
    pub fn new<S>(store: S) -> Self
    where
        S: ConfigStore + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(store))),
        }
    }

    /// Run a closure with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn ConfigStore) -> R) -> ConfigResult<R> {
        let mut guard = self.inner.lock().map_err(|_| ConfigError::Poisoned)?;
        Ok(f(&mut **guard))
    }

    /// Persist the store.
    pub fn flush(&self) -> ConfigResult<()> {
        self.with(|store| store.flush())?
    }
}

impl std::fmt::Debug for SharedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedConfig").finish_non_exhaustive()
    }
}
