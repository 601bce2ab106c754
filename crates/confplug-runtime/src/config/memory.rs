//! In-memory config store.

use super::{ConfigError, ConfigResult, ConfigStore};
use indexmap::IndexMap;

/// Insertion-ordered, in-memory section/option store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryConfigStore {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-parsed sections.
    pub fn from_sections(sections: IndexMap<String, IndexMap<String, String>>) -> Self {
        Self { sections }
    }

    /// Borrow the raw sections.
    pub fn as_sections(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.sections
    }

    /// Whether the store has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn add_section(&mut self, section: &str) -> ConfigResult<()> {
        if self.sections.contains_key(section) {
            return Err(ConfigError::DuplicateSection(section.to_string()));
        }
        self.sections.insert(section.to_string(), IndexMap::new());
        Ok(())
    }

    fn has_option(&self, section: &str, option: &str) -> bool {
        self.sections
            .get(section)
            .map(|options| options.contains_key(option))
            .unwrap_or(false)
    }

    fn get(&self, section: &str, option: &str) -> ConfigResult<String> {
        let options = self
            .sections
            .get(section)
            .ok_or_else(|| ConfigError::NoSection(section.to_string()))?;

        options
            .get(option)
            .cloned()
            .ok_or_else(|| ConfigError::NoOption {
                section: section.to_string(),
                option: option.to_string(),
            })
    }

    fn set(&mut self, section: &str, option: &str, value: &str) -> ConfigResult<()> {
        let options = self
            .sections
            .get_mut(section)
            .ok_or_else(|| ConfigError::NoSection(section.to_string()))?;

        options.insert(option.to_string(), value.to_string());
        Ok(())
    }

    fn remove_option(&mut self, section: &str, option: &str) -> ConfigResult<bool> {
        let options = self
            .sections
            .get_mut(section)
            .ok_or_else(|| ConfigError::NoSection(section.to_string()))?;

        Ok(options.shift_remove(option).is_some())
    }

    fn remove_section(&mut self, section: &str) -> bool {
        self.sections.shift_remove(section).is_some()
    }

    fn sections(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    fn options(&self, section: &str) -> ConfigResult<Vec<String>> {
        self.sections
            .get(section)
            .map(|options| options.keys().cloned().collect())
            .ok_or_else(|| ConfigError::NoSection(section.to_string()))
    }
}
