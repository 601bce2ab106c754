//! Integration tests for the confplug CLI.
//!
//! Drives the sub-commands through a settings file on disk, the way the
//! binary does, and checks what ends up in the plugin config file.

use confplug_cli::commands::{run, Command, Session};
use confplug_cli::config::Settings;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a settings file plus descriptors for two categories.
fn setup(temp_dir: &TempDir) -> PathBuf {
    let root = temp_dir.path();
    let plugins = root.join("plugins");
    let filters = plugins.join("filters");
    std::fs::create_dir_all(&filters).unwrap();

    write_descriptor(&plugins, "echo.plug", "Echo", "Default", "echo");
    write_descriptor(&filters, "upper.plug", "Upper Case", "Text Filters", "counter");
    write_descriptor(&filters, "ghost.plug", "Ghost", "Text Filters", "missing-module");

    let settings = format!(
        r#"
log_level = "debug"

[plugins]
dirs = ["{}"]
extension = "plug"
categories = ["Default", "Text Filters"]

[config]
path = "{}"
"#,
        plugins.display(),
        root.join("state").join("plugins.toml").display()
    );

    let path = root.join("settings.toml");
    std::fs::write(&path, settings).unwrap();
    path
}

fn write_descriptor(dir: &Path, file: &str, name: &str, category: &str, module: &str) {
    let content = format!(
        "[plugin]\nname = \"{name}\"\ncategory = \"{category}\"\nmodule = \"{module}\"\ndescription = \"{name} plugin\"\n"
    );
    std::fs::write(dir.join(file), content).unwrap();
}

fn activate(category: &str, name: &str) -> Command {
    Command::Activate {
        category: category.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn test_list_from_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load(setup(&temp_dir)).unwrap();
    let session = Session::open(&settings).unwrap();

    // Ghost names an unknown module and is never registered.
    assert_eq!(session.report().discovered, 2);

    let out = run(&session, &Command::List).unwrap();
    assert_eq!(
        out,
        "Default\n  Echo [discovered] - Echo plugin\nText Filters\n  Upper Case [discovered] - Upper Case plugin\n"
    );
}

#[test]
fn test_activations_persist_per_category() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load(setup(&temp_dir)).unwrap();

    {
        let session = Session::open(&settings).unwrap();
        run(&session, &activate("Default", "Echo")).unwrap();
        run(&session, &activate("Text Filters", "Upper Case")).unwrap();
        // Activating twice keeps a single entry.
        run(&session, &activate("Default", "Echo")).unwrap();
    }

    let content = std::fs::read_to_string(settings.config_path().unwrap()).unwrap();
    assert!(content.contains("Default_plugins_to_load"));
    assert!(content.contains("Text_Filters_plugins_to_load"));
    assert_eq!(content.matches("Echo").count(), 1);

    let session = Session::open(&settings).unwrap();
    let activated: Vec<&str> = session
        .report()
        .activated
        .iter()
        .map(|p| p.name())
        .collect();
    assert_eq!(activated, vec!["Echo", "Upper Case"]);
}

#[test]
fn test_stale_entries_are_listed_as_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load(setup(&temp_dir)).unwrap();

    let config_path = settings.config_path().unwrap();
    std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    std::fs::write(
        &config_path,
        "[\"Plugin Management\"]\nText_Filters_plugins_to_load = \"Ghost;;Upper Case\"\n",
    )
    .unwrap();

    let session = Session::open(&settings).unwrap();
    let out = run(&session, &Command::List).unwrap();

    assert!(out.contains("Upper Case [activated]"));
    assert!(out.ends_with("skipped: Ghost (Text Filters)\n"));
}

#[test]
fn test_options_keep_host_sections() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load(setup(&temp_dir)).unwrap();

    let config_path = settings.config_path().unwrap();
    std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    std::fs::write(&config_path, "[Window]\nwidth = \"800\"\n").unwrap();

    {
        let session = Session::open(&settings).unwrap();
        let command = Command::SetOption {
            category: "Text Filters".to_string(),
            name: "Upper Case".to_string(),
            key: "locale".to_string(),
            value: "tr".to_string(),
        };
        assert_eq!(run(&session, &command).unwrap(), "Upper Case.locale = tr\n");
    }

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("Window"));
    assert!(content.contains("Text Filters plugin: Upper Case"));

    let session = Session::open(&settings).unwrap();
    let command = Command::GetOption {
        category: "Text Filters".to_string(),
        name: "Upper Case".to_string(),
        key: "locale".to_string(),
    };
    assert_eq!(run(&session, &command).unwrap(), "tr\n");
}

#[test]
fn test_invalid_settings_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    std::fs::write(&path, "log_level = \"chatty\"\n").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid log_level"));
}
