//! Integration tests for confplug-runtime.
//!
//! These tests cover:
//! - Descriptor discovery across several plugin directories
//! - Category registry population from discovered descriptors
//! - The TOML config store shared through `SharedConfig`
//! - Activation list encoding as it appears on disk

use confplug_runtime::{
    activation_list_option, decode_plugin_list, discover_plugins, encode_plugin_list,
    plugin_section, ActivationFlag, CategoryRegistry, ConfigStore, Plugin, PluginResult,
    PluginState, SharedConfig, TomlConfigStore, CONFIG_SECTION_NAME, DEFAULT_EXTENSION,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ==============================================================================
// Test Fixture Helpers
// ==============================================================================

/// Write a descriptor file and return its path.
fn create_descriptor(dir: &Path, config: DescriptorConfig) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();

    let mut descriptor = format!(
        "[plugin]\nname = \"{}\"\nmodule = \"{}\"\n",
        config.name,
        config.module.unwrap_or("test")
    );

    if let Some(category) = config.category {
        descriptor.push_str(&format!("category = \"{}\"\n", category));
    }

    if let Some(version) = config.version {
        descriptor.push_str(&format!("version = \"{}\"\n", version));
    }

    let file_name = config
        .file_name
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.plugin.toml", config.name.replace(' ', "_")));
    let path = dir.join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(descriptor.as_bytes()).unwrap();

    path
}

/// Configuration for creating a test descriptor.
#[derive(Default)]
struct DescriptorConfig<'a> {
    name: &'a str,
    module: Option<&'a str>,
    category: Option<&'a str>,
    version: Option<&'a str>,
    file_name: Option<&'a str>,
}

#[derive(Default)]
struct FixturePlugin {
    flag: ActivationFlag,
}

impl Plugin for FixturePlugin {
    fn activate(&self) -> PluginResult<()> {
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

// ==============================================================================
// Discovery
// ==============================================================================

#[test]
fn test_discover_across_directories() {
    let temp_dir = TempDir::new().unwrap();
    let user = temp_dir.path().join("user");
    let system = temp_dir.path().join("system");

    create_descriptor(
        &user,
        DescriptorConfig {
            name: "Echo",
            version: Some("1.0.0"),
            ..Default::default()
        },
    );
    create_descriptor(
        &system,
        DescriptorConfig {
            name: "Echo",
            version: Some("0.9.0"),
            ..Default::default()
        },
    );
    create_descriptor(
        &system,
        DescriptorConfig {
            name: "Upper Case",
            category: Some("Text Filters"),
            ..Default::default()
        },
    );

    let candidates = discover_plugins(&[user, system], DEFAULT_EXTENSION).unwrap();
    assert_eq!(candidates.len(), 2);

    let echo = candidates.iter().find(|c| c.name() == "Echo").unwrap();
    assert_eq!(echo.manifest.plugin.version.as_deref(), Some("1.0.0"));
    assert_eq!(echo.category(), "Default");

    let upper = candidates.iter().find(|c| c.name() == "Upper Case").unwrap();
    assert_eq!(upper.category(), "Text Filters");
}

#[test]
fn test_discover_custom_extension() {
    let temp_dir = TempDir::new().unwrap();

    create_descriptor(
        temp_dir.path(),
        DescriptorConfig {
            name: "Echo",
            file_name: Some("echo.legacy-plugin"),
            ..Default::default()
        },
    );
    create_descriptor(
        temp_dir.path(),
        DescriptorConfig {
            name: "Other",
            ..Default::default()
        },
    );

    let candidates =
        discover_plugins(&[temp_dir.path().to_path_buf()], "legacy-plugin").unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name(), "Echo");
}

#[test]
fn test_registry_from_candidates() {
    let temp_dir = TempDir::new().unwrap();
    create_descriptor(
        temp_dir.path(),
        DescriptorConfig {
            name: "Echo",
            ..Default::default()
        },
    );
    create_descriptor(
        temp_dir.path(),
        DescriptorConfig {
            name: "Stray",
            category: Some("Unmanaged"),
            ..Default::default()
        },
    );

    let candidates =
        discover_plugins(&[temp_dir.path().to_path_buf()], DEFAULT_EXTENSION).unwrap();

    let mut registry = CategoryRegistry::with_categories(["Default"]);
    let registered = candidates
        .iter()
        .filter(|c| {
            registry.register(
                c.manifest.to_info(Some(&c.path)),
                Arc::new(FixturePlugin::default()),
            )
        })
        .count();

    assert_eq!(registered, 1);
    let echo = registry.get("Default", "Echo").unwrap();
    assert_eq!(echo.plugin.state(), PluginState::Discovered);
    assert_eq!(echo.info.module, "test");
}

// ==============================================================================
// Config store
// ==============================================================================

#[test]
fn test_activation_list_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plugins.toml");

    let shared = SharedConfig::new(TomlConfigStore::open(&path).unwrap());
    let option = activation_list_option("Text Filters");

    shared
        .with(|store| {
            store.add_section(CONFIG_SECTION_NAME)?;
            store.set(
                CONFIG_SECTION_NAME,
                &option,
                &encode_plugin_list(["Upper Case", "Reverse"]),
            )?;
            store.add_section(&plugin_section("Text Filters", "Reverse"))?;
            store.set(&plugin_section("Text Filters", "Reverse"), "words", "true")
        })
        .unwrap()
        .unwrap();
    shared.flush().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Plugin Management"));
    assert!(content.contains("Text_Filters_plugins_to_load"));
    assert!(content.contains("Upper Case;;Reverse"));
    assert!(content.contains("Text Filters plugin: Reverse"));

    let reopened = TomlConfigStore::open(&path).unwrap();
    let value = reopened.get(CONFIG_SECTION_NAME, &option).unwrap();
    assert_eq!(decode_plugin_list(&value), vec!["Upper Case", "Reverse"]);
}

#[test]
fn test_host_sections_survive() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.toml");
    std::fs::write(&path, "[Window]\nwidth = 800\ntitle = \"demo\"\n").unwrap();

    let mut store = TomlConfigStore::open(&path).unwrap();
    store.add_section(CONFIG_SECTION_NAME).unwrap();
    store
        .set(CONFIG_SECTION_NAME, "Default_plugins_to_load", "Echo")
        .unwrap();
    store.flush().unwrap();

    let reopened = TomlConfigStore::open(&path).unwrap();
    assert_eq!(reopened.sections(), vec!["Window", CONFIG_SECTION_NAME]);
    assert_eq!(reopened.get("Window", "width").unwrap(), "800");
    assert_eq!(reopened.get("Window", "title").unwrap(), "demo");
}
