//! Sub-command handlers.
//!
//! Every handler runs against a [`Session`]: a coordinator backed by the TOML
//! plugin config, with a notifier that writes the file back after each change.
//! Mutating handlers flush once more before reporting success, so a write
//! failure surfaces as an error. Handlers return the text to print so they can
//! be tested without a terminal.

use crate::builtin;
use crate::config::Settings;
use anyhow::{Context, Result};
use clap::Subcommand;
use confplug_manager::{ActivationCoordinator, ChangeNotifier, CollectReport, ManifestDiscoverer};
use confplug_runtime::{SharedConfig, TomlConfigStore};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

/// Plugin sub-commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List managed categories and their plugins
    List,
    /// Activate a plugin and remember it
    Activate {
        /// Plugin category
        category: String,
        /// Plugin name
        name: String,
    },
    /// Deactivate a plugin and forget it
    Deactivate {
        /// Plugin category
        category: String,
        /// Plugin name
        name: String,
    },
    /// Store an option in a plugin's section
    SetOption {
        category: String,
        name: String,
        key: String,
        value: String,
    },
    /// Print an option from a plugin's section
    GetOption {
        category: String,
        name: String,
        key: String,
    },
}

/// Run a command against an open session.
pub fn run(session: &Session, command: &Command) -> Result<String> {
    match command {
        Command::List => list(session),
        Command::Activate { category, name } => activate(session, category, name),
        Command::Deactivate { category, name } => deactivate(session, category, name),
        Command::SetOption {
            category,
            name,
            key,
            value,
        } => set_option(session, category, name, key, value),
        Command::GetOption {
            category,
            name,
            key,
        } => get_option(session, category, name, key),
    }
}

/// A coordinator that has already restored activations from the config file.
pub struct Session {
    coordinator: ActivationCoordinator,
    report: CollectReport,
    config_path: PathBuf,
}

impl Session {
    /// Discover plugins and activate everything the config file lists.
    pub fn open(settings: &Settings) -> Result<Self> {
        let config_path = settings.config_path()?;
        let store = TomlConfigStore::open(&config_path).with_context(|| {
            format!("Failed to open plugin config: {}", config_path.display())
        })?;
        let config = SharedConfig::new(store);

        let discoverer = ManifestDiscoverer::new(builtin::factories())
            .with_dirs(settings.plugin_dirs()?)
            .with_extension(settings.plugins.extension.clone())
            .with_categories(settings.plugins.categories.clone());

        let mut coordinator = ActivationCoordinator::new(
            Box::new(discoverer),
            config.clone(),
            write_through(config),
        );

        let report = coordinator
            .collect_and_activate_from_config()
            .context("Failed to activate plugins from config")?;

        info!(
            "Session ready: {} discovered, {} active",
            report.discovered,
            report.activated.len()
        );

        Ok(Self {
            coordinator,
            report,
            config_path,
        })
    }

    pub fn coordinator(&self) -> &ActivationCoordinator {
        &self.coordinator
    }

    /// Result of the startup activation pass.
    pub fn report(&self) -> &CollectReport {
        &self.report
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Write pending config changes, failing if they cannot reach the disk.
    pub fn persist(&self) -> Result<()> {
        self.coordinator.config().flush().with_context(|| {
            format!(
                "Failed to write plugin config: {}",
                self.config_path.display()
            )
        })
    }
}

/// Notifier that flushes the store whenever the coordinator changes it.
fn write_through(config: SharedConfig) -> ChangeNotifier {
    ChangeNotifier::new(move || match config.flush() {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to write plugin config: {}", e);
            false
        }
    })
}

/// `list`: every managed category with its plugins and their state.
pub fn list(session: &Session) -> Result<String> {
    let coordinator = session.coordinator();
    let mut out = String::new();

    for category in coordinator.categories() {
        writeln!(out, "{}", category)?;

        let plugins = coordinator.plugins_of_category(&category)?;
        if plugins.is_empty() {
            writeln!(out, "  (no plugins)")?;
        }

        for entry in plugins {
            write!(out, "  {} [{}]", entry.name(), entry.plugin.state().as_str())?;
            if let Some(version) = &entry.info.version {
                write!(out, " v{}", version)?;
            }
            if let Some(description) = &entry.info.description {
                write!(out, " - {}", description)?;
            }
            writeln!(out)?;
        }
    }

    for (category, name) in &session.report().skipped {
        writeln!(out, "skipped: {} ({})", name, category)?;
    }

    Ok(out)
}

/// `activate <category> <name>`
pub fn activate(session: &Session, category: &str, name: &str) -> Result<String> {
    let activated = session
        .coordinator()
        .activate_by_name(category, name)
        .with_context(|| format!("Failed to activate {} ({})", name, category))?;
    session.persist()?;

    Ok(format!(
        "Activated {} ({})\n",
        activated.name(),
        activated.category()
    ))
}

/// `deactivate <category> <name>`
pub fn deactivate(session: &Session, category: &str, name: &str) -> Result<String> {
    session
        .coordinator()
        .deactivate_by_name(category, name)
        .with_context(|| format!("Failed to deactivate {} ({})", name, category))?;
    session.persist()?;

    Ok(format!("Deactivated {} ({})\n", name, category))
}

/// `set-option <category> <name> <key> <value>`
pub fn set_option(
    session: &Session,
    category: &str,
    name: &str,
    key: &str,
    value: &str,
) -> Result<String> {
    session
        .coordinator()
        .register_option(category, name, key, value)
        .with_context(|| format!("Failed to set option {} for {} ({})", key, name, category))?;
    session.persist()?;

    Ok(format!("{}.{} = {}\n", name, key, value))
}

/// `get-option <category> <name> <key>`
pub fn get_option(session: &Session, category: &str, name: &str, key: &str) -> Result<String> {
    let value = session
        .coordinator()
        .read_option(category, name, key)
        .with_context(|| format!("Failed to read option {} for {} ({})", key, name, category))?;

    Ok(format!("{}\n", value))
}
