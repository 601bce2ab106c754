//! Plugin descriptor discovery.
//!
//! Plugin directories are walked recursively for files ending in
//! `.<extension>` (by default `.plugin.toml`). Directories are scanned in the
//! order given; when two descriptors declare the same `(category, name)` the
//! first one found wins.
//!
//! Without explicit directories, the user plugins directory is used:
//! `$XDG_DATA_HOME/confplug/plugins/`.

use crate::error::PluginResult;
use crate::manifest::PluginManifest;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default descriptor file extension.
pub const DEFAULT_EXTENSION: &str = "plugin.toml";

/// A descriptor found on disk.
#[derive(Debug, Clone)]
pub struct PluginCandidate {
    /// Path to the descriptor file.
    pub path: PathBuf,

    /// Parsed descriptor.
    pub manifest: PluginManifest,
}

impl PluginCandidate {
    /// Get the plugin name.
    pub fn name(&self) -> &str {
        &self.manifest.plugin.name
    }

    /// Get the plugin category.
    pub fn category(&self) -> &str {
        &self.manifest.plugin.category
    }

    /// Get the factory module.
    pub fn module(&self) -> &str {
        &self.manifest.plugin.module
    }
}

/// Get the user plugins directory.
pub fn user_plugins_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "confplug").map(|dirs| dirs.data_dir().join("plugins"))
}

/// Discover all descriptors in the given directories.
pub fn discover_plugins(dirs: &[PathBuf], extension: &str) -> PluginResult<Vec<PluginCandidate>> {
    let mut candidates = Vec::new();
    let mut seen = HashSet::new();

    for dir in dirs {
        debug!("Scanning plugins directory: {:?}", dir);
        discover_in_directory(dir, extension, &mut candidates, &mut seen)?;
    }

    info!("Discovered {} plugin descriptors", candidates.len());
    Ok(candidates)
}

/// Discover descriptors in a specific directory and its subdirectories.
pub fn discover_in_directory(
    dir: &Path,
    extension: &str,
    candidates: &mut Vec<PluginCandidate>,
    seen: &mut HashSet<(String, String)>,
) -> PluginResult<()> {
    if !dir.exists() {
        return Ok(());
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("Failed to read plugins directory {:?}: {}", dir, e);
            return Ok(());
        }
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            discover_in_directory(&path, extension, candidates, seen)?;
            continue;
        }

        if !has_extension(&path, extension) {
            continue;
        }

        match PluginManifest::from_file(&path) {
            Ok(manifest) => {
                let key = (
                    manifest.plugin.category.clone(),
                    manifest.plugin.name.clone(),
                );

                if seen.contains(&key) {
                    debug!("Skipping duplicate plugin: {} ({})", key.1, key.0);
                    continue;
                }

                info!(
                    "Discovered plugin: {} ({}) at {:?}",
                    manifest.plugin.name, manifest.plugin.category, path
                );

                seen.insert(key);
                candidates.push(PluginCandidate { path, manifest });
            }
            Err(e) => {
                warn!("Failed to load descriptor from {:?}: {}", path, e);
            }
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(&suffix) && n.len() > suffix.len())
        .unwrap_or(false)
}
