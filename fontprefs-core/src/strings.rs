//! Localized string table for the Fonts and Encoding page.

use std::collections::{BTreeMap, HashMap};

pub const PAGE_TITLE: &str = "fontSettingsPageTabTitle";
pub const PLACEHOLDER: &str = "fontSettingsPlaceholder";
pub const SAMPLE_SENTENCE: &str = "fontSettingsLoremIpsum";

const ENGLISH: [(&str, &str); 3] = [
    (PAGE_TITLE, "Fonts and Encoding"),
    (PLACEHOLDER, "(loading)"),
    (
        SAMPLE_SENTENCE,
        "It was a bright cold day in April, and the clocks were striking thirteen.",
    ),
];

/// Read-only key → string lookup. Unknown keys yield an empty string.
#[derive(Debug, Clone)]
pub struct LocalizedStrings {
    table: HashMap<String, String>,
}

impl Default for LocalizedStrings {
    fn default() -> Self {
        Self {
            table: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl LocalizedStrings {
    /// English defaults with `overrides` applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut strings = Self::default();
        for (key, value) in overrides {
            strings.table.insert(key.clone(), value.clone());
        }
        strings
    }

    pub fn get(&self, key: &str) -> &str {
        self.table.get(key).map(String::as_str).unwrap_or("")
    }
}
