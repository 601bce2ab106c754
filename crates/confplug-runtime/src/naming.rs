//! Config key encoding.
//!
//! These strings are the on-disk contract between confplug and any other tool
//! editing the same configuration file, so they must stay bit-exact:
//!
//! - activation lists live in the `"Plugin Management"` section, under the
//!   option `"<category>_plugins_to_load"` (spaces in the category become `_`)
//! - plugin options live in the section `"<category> plugin: <name>"`
//! - activation lists are plugin names joined with `";;"`

use crate::error::{PluginError, PluginResult};

/// Section holding every category's activation list.
pub const CONFIG_SECTION_NAME: &str = "Plugin Management";

/// Delimiter of serialized activation lists. Never valid inside a plugin name.
pub const PLUGIN_NAME_FORBIDDEN_STRING: &str = ";;";

/// Category used when a descriptor does not declare one.
pub const DEFAULT_CATEGORY: &str = "Default";

const ACTIVATION_LIST_SUFFIX: &str = "_plugins_to_load";

/// Option name of a category's activation list.
///
/// Case is preserved; only spaces are rewritten.
pub fn activation_list_option(category: &str) -> String {
    format!("{}{}", category.replace(' ', "_"), ACTIVATION_LIST_SUFFIX)
}

/// Section name holding a plugin's own options.
pub fn plugin_section(category: &str, name: &str) -> String {
    format!("{} plugin: {}", category, name)
}

/// Join plugin names into the single-string activation list format.
pub fn encode_plugin_list<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(PLUGIN_NAME_FORBIDDEN_STRING)
}

/// Split a serialized activation list back into plugin names.
///
/// Surrounding whitespace is trimmed from each entry and empty entries are
/// dropped, so hand-edited values like `"a ;; b;;"` still parse.
pub fn decode_plugin_list(value: &str) -> Vec<String> {
    value
        .split(PLUGIN_NAME_FORBIDDEN_STRING)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reject names that could not survive a round trip through an activation list.
pub fn validate_plugin_name(name: &str) -> PluginResult<()> {
    if name.trim().is_empty() {
        return Err(PluginError::InvalidPluginName(
            "Plugin name cannot be empty".to_string(),
        ));
    }

    if name.contains(PLUGIN_NAME_FORBIDDEN_STRING) {
        return Err(PluginError::InvalidPluginName(format!(
            "'{}' contains the reserved string '{}'",
            name, PLUGIN_NAME_FORBIDDEN_STRING
        )));
    }

    if name.trim() != name {
        return Err(PluginError::InvalidPluginName(format!(
            "'{}' has leading or trailing whitespace",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_list_option() {
        assert_eq!(activation_list_option("Default"), "Default_plugins_to_load");
        assert_eq!(
            activation_list_option("Text Filters"),
            "Text_Filters_plugins_to_load"
        );
    }

    #[test]
    fn test_plugin_section() {
        assert_eq!(plugin_section("Default", "Echo"), "Default plugin: Echo");
        assert_eq!(
            plugin_section("Text Filters", "Upper Case"),
            "Text Filters plugin: Upper Case"
        );
    }

    #[test]
    fn test_list_round_trip() {
        let encoded = encode_plugin_list(["a", "b", "c"]);
        assert_eq!(encoded, "a;;b;;c");
        assert_eq!(decode_plugin_list(&encoded), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_decode_tolerates_hand_edits() {
        assert_eq!(decode_plugin_list(" a ;; b;;"), vec!["a", "b"]);
        assert!(decode_plugin_list("").is_empty());
        assert_eq!(decode_plugin_list("single"), vec!["single"]);
    }

    #[test]
    fn test_validate_plugin_name() {
        assert!(validate_plugin_name("Echo").is_ok());
        assert!(validate_plugin_name("Upper Case").is_ok());
        assert!(validate_plugin_name("bad;;name").is_err());
        assert!(validate_plugin_name("").is_err());
        assert!(validate_plugin_name(" padded").is_err());
    }
}
