//! Plugin lifecycle.
//!
//! Plugins are shared as `Arc<dyn Plugin>` between the registry and the
//! handles returned on activation, so lifecycle methods take `&self`.
//! `ActivationFlag` covers the common case of a plugin that only needs to
//! remember whether it is active.

use crate::error::PluginResult;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

/// An activatable unit of functionality.
pub trait Plugin: Send + Sync {
    /// Bring the plugin up.
    ///
    /// Returning `Ok(())` does not imply success: callers check
    /// [`Plugin::is_activated`] afterwards.
    fn activate(&self) -> PluginResult<()>;

    /// Shut the plugin down.
    fn deactivate(&self) -> PluginResult<()>;

    /// Whether the plugin currently considers itself active.
    fn is_activated(&self) -> bool;

    /// Current lifecycle state.
    fn state(&self) -> PluginState;
}

/// Lifecycle state of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Instantiated by discovery, never activated.
    Discovered,
    /// Currently active.
    Activated,
    /// Was active, then deactivated.
    Deactivated,
}

impl PluginState {
    /// Convert state to string representation.
    pub fn as_str(&self) -> &str {
        match self {
            PluginState::Discovered => "discovered",
            PluginState::Activated => "activated",
            PluginState::Deactivated => "deactivated",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            PluginState::Discovered => 0,
            PluginState::Activated => 1,
            PluginState::Deactivated => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => PluginState::Activated,
            2 => PluginState::Deactivated,
            _ => PluginState::Discovered,
        }
    }
}

/// Lock-free lifecycle state for plugin implementations.
#[derive(Debug)]
pub struct ActivationFlag {
    state: AtomicU8,
}

impl ActivationFlag {
    /// Create a flag in the `Discovered` state.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(PluginState::Discovered.to_u8()),
        }
    }

    pub fn activate(&self) {
        self.set(PluginState::Activated);
    }

    pub fn deactivate(&self) {
        self.set(PluginState::Deactivated);
    }

    pub fn is_activated(&self) -> bool {
        self.get() == PluginState::Activated
    }

    pub fn get(&self) -> PluginState {
        PluginState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set(&self, state: PluginState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }
}

impl Default for ActivationFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptive information about a discovered plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Name, unique within the category.
    pub name: String,

    /// Category the plugin belongs to.
    pub category: String,

    /// Factory key the plugin was instantiated from.
    pub module: String,

    pub version: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub website: Option<String>,

    /// Descriptor file the plugin was discovered from, if any.
    pub path: Option<PathBuf>,
}

impl PluginInfo {
    /// Create info with only the identifying fields set.
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            module: module.into(),
            version: None,
            description: None,
            author: None,
            website: None,
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_flag_transitions() {
        let flag = ActivationFlag::new();
        assert_eq!(flag.get(), PluginState::Discovered);
        assert!(!flag.is_activated());

        flag.activate();
        assert_eq!(flag.get(), PluginState::Activated);
        assert!(flag.is_activated());

        flag.deactivate();
        assert_eq!(flag.get(), PluginState::Deactivated);
        assert!(!flag.is_activated());
    }

    #[test]
    fn test_state_as_str() {
        assert_eq!(PluginState::Discovered.as_str(), "discovered");
        assert_eq!(PluginState::Activated.as_str(), "activated");
        assert_eq!(PluginState::Deactivated.as_str(), "deactivated");
    }
}
