//! # Built-in plugins
//!
//! Plugins compiled into the CLI so descriptors have something to point at.
//!
//! - `echo`: returns its input, optionally prefixed
//! - `counter`: counts how many times it has been activated in this process
//!
//! A descriptor selects one with `module = "echo"` or `module = "counter"`.

use confplug_manager::PluginFactories;
use confplug_runtime::{ActivationFlag, Plugin, PluginInfo, PluginResult, PluginState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Factories for every built-in plugin.
pub fn factories() -> PluginFactories {
    PluginFactories::new()
        .with("echo", |info: &PluginInfo| -> PluginResult<Arc<dyn Plugin>> {
            Ok(Arc::new(EchoPlugin::new(&info.name)))
        })
        .with("counter", |info: &PluginInfo| -> PluginResult<Arc<dyn Plugin>> {
            Ok(Arc::new(CounterPlugin::new(&info.name)))
        })
}

/// Repeats its input.
#[derive(Debug)]
pub struct EchoPlugin {
    name: String,
    flag: ActivationFlag,
}

impl EchoPlugin {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flag: ActivationFlag::new(),
        }
    }

    /// Echo `input` behind `prefix`.
    pub fn echo(&self, prefix: &str, input: &str) -> String {
        format!("{}{}", prefix, input)
    }
}

impl Plugin for EchoPlugin {
    fn activate(&self) -> PluginResult<()> {
        debug!(plugin = %self.name, "echo activated");
        self.flag.activate();
        Ok(())
    }

    fn deactivate(&self) -> PluginResult<()> {
        self.flag.deactivate();
        Ok(())
    }

    fn is_activated(&self) -> bool {
        self.flag.is_activated()
    }

    fn state(&self) -> PluginState {
        self.flag.get()
    }
}

/// Counts its activations.
#[derive(Debug)]
pub struct CounterPlugin {
    name: String,
    flag: ActivationFlag,
    activations: AtomicUsize,
}

impl CounterPlugin {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flag: ActivationFlag::new(),
            activations: AtomicUsize::new(0),
        }
    }

    /// Number of times `activate` has been called.
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

impl Plugin for CounterPlugin {
    fn activate(&self) -> PluginResult<()> {
        let count = self.activations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(plugin = %self.name, count, "counter activated");
        self.flag.activate();
        Ok(())
    }

    fn deactivate(&self) -> PluginResult<()> {
        self.flag.deactivate();
        Ok(())
    }

    fn is_activated(&self) -> bool {
        self.flag.is_activated()
    }

    fn state(&self) -> PluginState {
        self.flag.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories_cover_builtins() {
        let factories = factories();
        assert_eq!(factories.modules(), vec!["counter", "echo"]);

        let plugin = factories
            .create(&PluginInfo::new("Default", "Echo", "echo"))
            .unwrap();
        assert_eq!(plugin.state(), PluginState::Discovered);
    }

    #[test]
    fn test_echo() {
        let echo = EchoPlugin::new("Echo");
        assert_eq!(echo.echo(">> ", "hi"), ">> hi");

        echo.activate().unwrap();
        assert!(echo.is_activated());
    }

    #[test]
    fn test_counter_counts_activations() {
        let counter = CounterPlugin::new("Counter");
        counter.activate().unwrap();
        counter.deactivate().unwrap();
        counter.activate().unwrap();

        assert_eq!(counter.activations(), 2);
        assert_eq!(counter.state(), PluginState::Activated);
    }
}
