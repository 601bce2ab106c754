//! # confplug
//!
//! Command-line host for the plugin activation coordinator.
//!
//! Each run:
//! - Loads settings from `$XDG_CONFIG_HOME/confplug/settings.toml`
//! - Discovers plugin descriptors in the configured directories
//! - Re-activates every plugin the plugin config lists
//! - Runs one sub-command, writing any change back to the plugin config
//!
//! ## Running
//!
//! ```bash
//! # Show plugins and their state
//! confplug list
//!
//! # Activate a plugin; it stays active on the next run
//! confplug activate Default Echo
//!
//! # Per-plugin options
//! confplug set-option Default Echo prefix ">> "
//! confplug get-option Default Echo prefix
//!
//! # With debug logging
//! confplug --verbose list
//! RUST_LOG=debug confplug list
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use confplug_cli::commands::{self, Command, Session};
use confplug_cli::config::Settings;

#[derive(Parser)]
#[command(name = "confplug", about = "Config-backed plugin activation")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting confplug v{}", env!("CARGO_PKG_VERSION"));
    debug!("Settings: {:?}", settings);

    let session = Session::open(&settings)?;
    let output = commands::run(&session, &cli.command)?;
    print!("{}", output);

    Ok(())
}
