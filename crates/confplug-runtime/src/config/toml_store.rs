//! TOML-backed config store.
//!
//! Each section is a TOML table and each option a string value:
//!
//! ```toml
//! ["Plugin Management"]
//! Default_plugins_to_load = "Echo;;Counter"
//!
//! ["Default plugin: Echo"]
//! prefix = ">> "
//! ```
//!
//! Hand-written scalars (`count = 3`, `enabled = true`) are read back as their
//! string form and written back with their original type as long as the value
//! is unchanged. Floats read back in their shortest round-trip form with a
//! decimal point (`1.0` stays `"1.0"`, `2.50` becomes `"2.5"`).
//!
//! Values the store cannot express as options belong to the host: top-level
//! keys, arrays and nested tables are not visible through [`ConfigStore`] but
//! are written back untouched. Changes stay in memory until
//! [`ConfigStore::flush`].

use super::{ConfigError, ConfigResult, ConfigStore, MemoryConfigStore};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The document as it was read from disk.
#[derive(Debug, Default)]
struct Original {
    /// Top-level entries that are not sections.
    root: toml::Table,
    /// Every option of every section, with its on-disk type.
    sections: IndexMap<String, toml::Table>,
}

/// Config store persisted as a TOML document.
#[derive(Debug)]
pub struct TomlConfigStore {
    path: PathBuf,
    store: MemoryConfigStore,
    original: Original,
    dirty: bool,
}

impl TomlConfigStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();

        let (store, original) = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let (store, original) = Self::read_document(&content)?;
            debug!("Loaded {} config sections from {:?}", store.sections().len(), path);
            (store, original)
        } else {
            debug!("Config file {:?} does not exist yet", path);
            (MemoryConfigStore::new(), Original::default())
        };

        Ok(Self {
            path,
            store,
            original,
            dirty: false,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are changes not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Parse a TOML document into a memory store holding its scalar options.
    pub fn parse(content: &str) -> ConfigResult<MemoryConfigStore> {
        Self::read_document(content).map(|(store, _)| store)
    }

    /// Render the store as a TOML document, host-owned values included.
    pub fn render(&self) -> ConfigResult<String> {
        let mut document = self.original.root.clone();
        let no_original = toml::Table::new();

        for (section, options) in self.store.as_sections() {
            let original = self.original.sections.get(section).unwrap_or(&no_original);
            let mut table = toml::Table::new();

            for (option, value) in original {
                match options.get(option) {
                    Some(current) => {
                        table.insert(option.clone(), keep_type(value, current));
                    }
                    None if scalar_string(value).is_none() => {
                        table.insert(option.clone(), value.clone());
                    }
                    // Removed since it was read.
                    None => {}
                }
            }

            for (option, current) in options {
                if !table.contains_key(option) {
                    table.insert(option.clone(), toml::Value::String(current.clone()));
                }
            }

            document.insert(section.clone(), toml::Value::Table(table));
        }

        toml::to_string(&document).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    fn read_document(content: &str) -> ConfigResult<(MemoryConfigStore, Original)> {
        let document: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;

        let mut original = Original::default();
        let mut sections = IndexMap::new();

        for (section, value) in document {
            let toml::Value::Table(table) = value else {
                original.root.insert(section, value);
                continue;
            };

            let options: IndexMap<String, String> = table
                .iter()
                .filter_map(|(option, value)| Some((option.clone(), scalar_string(value)?)))
                .collect();

            sections.insert(section.clone(), options);
            original.sections.insert(section, table);
        }

        Ok((MemoryConfigStore::from_sections(sections), original))
    }

    fn touch<T>(&mut self, result: ConfigResult<T>) -> ConfigResult<T> {
        if result.is_ok() {
            self.dirty = true;
        }
        result
    }
}

/// String form of a scalar value, `None` for arrays and tables.
fn scalar_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(format!("{:?}", f)),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// The original value if `current` still matches it, else `current` as a string.
fn keep_type(original: &toml::Value, current: &str) -> toml::Value {
    match scalar_string(original) {
        Some(s) if s == current => original.clone(),
        _ => toml::Value::String(current.to_string()),
    }
}

impl ConfigStore for TomlConfigStore {
    fn has_section(&self, section: &str) -> bool {
        self.store.has_section(section)
    }

    fn add_section(&mut self, section: &str) -> ConfigResult<()> {
        let result = self.store.add_section(section);
        self.touch(result)
    }

    fn has_option(&self, section: &str, option: &str) -> bool {
        self.store.has_option(section, option)
    }

    fn get(&self, section: &str, option: &str) -> ConfigResult<String> {
        self.store.get(section, option)
    }

    fn set(&mut self, section: &str, option: &str, value: &str) -> ConfigResult<()> {
        let result = self.store.set(section, option, value);
        self.touch(result)
    }

    fn remove_option(&mut self, section: &str, option: &str) -> ConfigResult<bool> {
        let result = self.store.remove_option(section, option);
        self.touch(result)
    }

    fn remove_section(&mut self, section: &str) -> bool {
        let removed = self.store.remove_section(section);
        if removed {
            self.original.sections.shift_remove(section);
        }
        self.dirty |= removed;
        removed
    }

    fn sections(&self) -> Vec<String> {
        self.store.sections()
    }

    fn options(&self, section: &str) -> ConfigResult<Vec<String>> {
        self.store.options(section)
    }

    fn flush(&mut self) -> ConfigResult<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = self.render()?;
        fs::write(&self.path, content)?;
        self.dirty = false;

        info!("Saved plugin configuration to {:?}", self.path);
        Ok(())
    }
}
