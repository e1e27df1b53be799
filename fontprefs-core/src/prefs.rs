//! Preference binding: named preference values, policy locks, change
//! notification.
//!
//! `PreferenceBinding` is the seam the page writes through. `PreferenceStore`
//! is the in-memory implementation: registered defaults, user values loaded
//! from a JSON file, and managed values forced by policy. Observers receive
//! a `PrefChange` over an mpsc channel whenever an effective value changes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Browser preference names used by the Fonts and Encoding page.
pub mod keys {
    pub const SERIF_FONT_FAMILY: &str = "webkit.webprefs.serif_font_family";
    pub const SANS_SERIF_FONT_FAMILY: &str = "webkit.webprefs.sansserif_font_family";
    pub const FIXED_FONT_FAMILY: &str = "webkit.webprefs.fixed_font_family";
    pub const DEFAULT_FONT_SIZE: &str = "webkit.webprefs.default_font_size";
    pub const DEFAULT_FIXED_FONT_SIZE: &str = "webkit.webprefs.default_fixed_font_size";
    pub const MINIMUM_FONT_SIZE: &str = "webkit.webprefs.minimum_font_size";
    pub const MINIMUM_LOGICAL_FONT_SIZE: &str = "webkit.webprefs.minimum_logical_font_size";
    pub const DEFAULT_CHARSET: &str = "intl.charset_default";
}

/// Opaque name of a persisted setting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceKey(String);

impl PreferenceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PreferenceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Integer(i32),
    String(String),
}

impl PrefValue {
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            PrefValue::Integer(v) => Some(*v),
            PrefValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            PrefValue::Integer(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PrefValue::Integer(_) => "an integer",
            PrefValue::String(_) => "a string",
        }
    }

    /// Stored JSON value as a preference value. Only strings and integers
    /// that fit `i32` convert.
    pub fn from_json(value: &serde_json::Value) -> Option<PrefValue> {
        match value {
            serde_json::Value::String(s) => Some(PrefValue::String(s.clone())),
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(PrefValue::Integer),
            _ => None,
        }
    }

    fn same_kind(&self, other: &PrefValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Integer(v) => write!(f, "{v}"),
            PrefValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Where an effective value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefSource {
    Default,
    User,
    Managed,
}

impl PrefSource {
    pub fn label(self) -> &'static str {
        match self {
            PrefSource::Default => "default",
            PrefSource::User => "user",
            PrefSource::Managed => "policy",
        }
    }
}

#[derive(Debug, Error)]
pub enum PrefError {
    #[error("unknown preference '{0}'")]
    Unknown(String),

    #[error("preference '{0}' is managed by policy")]
    Managed(String),

    #[error("preference '{key}' expects {expected} value")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("preferences file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preferences file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A change to an effective preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefChange {
    pub key: PreferenceKey,
    pub value: PrefValue,
    /// Provenance tag passed by the writer.
    pub origin: String,
}

/// Named preference storage as seen by a settings page.
pub trait PreferenceBinding {
    fn get(&self, key: &str) -> Option<PrefValue>;

    fn is_managed(&self, key: &str) -> bool;

    fn set_string_pref(&mut self, key: &str, value: &str, origin: &str) -> Result<(), PrefError>;

    fn set_integer_pref(&mut self, key: &str, value: i32, origin: &str) -> Result<(), PrefError>;

    fn get_integer(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(|v| v.as_integer())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_owned))
    }
}

/// One row of a preference listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefEntry {
    pub key: PreferenceKey,
    pub value: PrefValue,
    pub source: PrefSource,
}

#[derive(Debug, Default)]
pub struct PreferenceStore {
    defaults: BTreeMap<String, PrefValue>,
    user: BTreeMap<String, PrefValue>,
    managed: BTreeMap<String, PrefValue>,
    observers: Vec<Sender<PrefChange>>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with every preference the Fonts and Encoding page touches,
    /// at browser default values.
    pub fn with_font_defaults() -> Self {
        let mut store = Self::new();
        store.register(keys::SERIF_FONT_FAMILY, PrefValue::String("Times New Roman".into()));
        store.register(
            keys::SANS_SERIF_FONT_FAMILY,
            PrefValue::String("Times New Roman".into()),
        );
        store.register(keys::FIXED_FONT_FAMILY, PrefValue::String("Courier New".into()));
        store.register(keys::DEFAULT_FONT_SIZE, PrefValue::Integer(16));
        store.register(keys::DEFAULT_FIXED_FONT_SIZE, PrefValue::Integer(13));
        store.register(keys::MINIMUM_FONT_SIZE, PrefValue::Integer(0));
        store.register(keys::MINIMUM_LOGICAL_FONT_SIZE, PrefValue::Integer(6));
        store.register(keys::DEFAULT_CHARSET, PrefValue::String("ISO-8859-1".into()));
        store
    }

    pub fn register(&mut self, key: &str, default: PrefValue) {
        self.defaults.insert(key.to_string(), default);
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.defaults.contains_key(key)
    }

    pub fn default_value(&self, key: &str) -> Option<&PrefValue> {
        self.defaults.get(key)
    }

    /// Subscribe to effective-value changes.
    pub fn observe(&mut self) -> Receiver<PrefChange> {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        rx
    }

    /// Force `key` to `value` and lock it against user writes.
    pub fn set_managed(&mut self, key: &str, value: PrefValue) -> Result<(), PrefError> {
        self.check(key, &value)?;
        let before = self.get(key);
        self.managed.insert(key.to_string(), value.clone());
        if before.as_ref() != Some(&value) {
            self.notify(key, value, "policy");
        }
        Ok(())
    }

    pub fn source(&self, key: &str) -> Option<PrefSource> {
        if self.managed.contains_key(key) {
            Some(PrefSource::Managed)
        } else if self.user.contains_key(key) {
            Some(PrefSource::User)
        } else if self.defaults.contains_key(key) {
            Some(PrefSource::Default)
        } else {
            None
        }
    }

    /// Every registered preference with its effective value, sorted by key.
    pub fn entries(&self) -> Vec<PrefEntry> {
        self.defaults
            .keys()
            .filter_map(|key| {
                Some(PrefEntry {
                    key: PreferenceKey::new(key.as_str()),
                    value: self.get(key)?,
                    source: self.source(key)?,
                })
            })
            .collect()
    }

    /// Drop the user value so the default (or policy) value applies again.
    pub fn clear_user_value(&mut self, key: &str) -> Result<(), PrefError> {
        if !self.is_registered(key) {
            return Err(PrefError::Unknown(key.to_string()));
        }
        let before = self.get(key);
        self.user.remove(key);
        let after = self.get(key);
        if let Some(value) = after.filter(|v| Some(v) != before.as_ref()) {
            self.notify(key, value, "");
        }
        Ok(())
    }

    /// Merge user values from a JSON file. A missing file leaves the store
    /// untouched. Unknown keys and unreadable or mistyped values are skipped
    /// one by one; only a file that is not a JSON object is an error.
    /// Returns how many values were applied.
    pub fn load_user_file(&mut self, path: &Path) -> Result<usize, PrefError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let values: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)?;
        let mut applied = 0;
        for (key, raw) in values {
            let Some(value) = PrefValue::from_json(&raw) else {
                warn!("skipping stored preference '{key}': unsupported value {raw}");
                continue;
            };
            match self.check(&key, &value) {
                Ok(()) => {
                    self.user.insert(key, value);
                    applied += 1;
                }
                Err(e) => warn!("skipping stored preference: {e}"),
            }
        }
        debug!("loaded {applied} preference values from {}", path.display());
        Ok(applied)
    }

    /// Write user values as pretty JSON. Creates parent directories.
    pub fn save_user_file(&self, path: &Path) -> Result<(), PrefError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.user)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn check(&self, key: &str, value: &PrefValue) -> Result<(), PrefError> {
        let default = self
            .defaults
            .get(key)
            .ok_or_else(|| PrefError::Unknown(key.to_string()))?;
        if !default.same_kind(value) {
            return Err(PrefError::TypeMismatch {
                key: key.to_string(),
                expected: default.kind(),
            });
        }
        Ok(())
    }

    fn set_user(&mut self, key: &str, value: PrefValue, origin: &str) -> Result<(), PrefError> {
        self.check(key, &value)?;
        if self.managed.contains_key(key) {
            return Err(PrefError::Managed(key.to_string()));
        }
        let before = self.get(key);
        self.user.insert(key.to_string(), value.clone());
        if before.as_ref() != Some(&value) {
            self.notify(key, value, origin);
        }
        Ok(())
    }

    fn notify(&mut self, key: &str, value: PrefValue, origin: &str) {
        debug!("preference {key} = {value}");
        let change = PrefChange {
            key: PreferenceKey::new(key),
            value,
            origin: origin.to_string(),
        };
        self.observers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}

impl PreferenceBinding for PreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.managed
            .get(key)
            .or_else(|| self.user.get(key))
            .or_else(|| self.defaults.get(key))
            .cloned()
    }

    fn is_managed(&self, key: &str) -> bool {
        self.managed.contains_key(key)
    }

    fn set_string_pref(&mut self, key: &str, value: &str, origin: &str) -> Result<(), PrefError> {
        self.set_user(key, PrefValue::String(value.to_string()), origin)
    }

    fn set_integer_pref(&mut self, key: &str, value: i32, origin: &str) -> Result<(), PrefError> {
        self.set_user(key, PrefValue::Integer(value), origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_visible() {
        let store = PreferenceStore::with_font_defaults();
        assert_eq!(store.get_integer(keys::DEFAULT_FONT_SIZE), Some(16));
        assert_eq!(store.get_string(keys::FIXED_FONT_FAMILY).as_deref(), Some("Courier New"));
        assert_eq!(store.source(keys::DEFAULT_FONT_SIZE), Some(PrefSource::Default));
    }

    #[test]
    fn user_value_overrides_default_and_notifies() {
        let mut store = PreferenceStore::with_font_defaults();
        let rx = store.observe();
        store.set_integer_pref(keys::DEFAULT_FONT_SIZE, 20, "").unwrap();

        assert_eq!(store.get_integer(keys::DEFAULT_FONT_SIZE), Some(20));
        let change = rx.try_recv().unwrap();
        assert_eq!(change.key.as_str(), keys::DEFAULT_FONT_SIZE);
        assert_eq!(change.value, PrefValue::Integer(20));
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        let mut store = PreferenceStore::with_font_defaults();
        let rx = store.observe();
        store.set_integer_pref(keys::DEFAULT_FONT_SIZE, 16, "").unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn rejects_unknown_and_mistyped_writes() {
        let mut store = PreferenceStore::with_font_defaults();
        assert!(matches!(
            store.set_string_pref("no.such.pref", "x", ""),
            Err(PrefError::Unknown(_))
        ));
        assert!(matches!(
            store.set_string_pref(keys::DEFAULT_FONT_SIZE, "big", ""),
            Err(PrefError::TypeMismatch { expected: "an integer", .. })
        ));
    }

    #[test]
    fn managed_value_wins_and_locks() {
        let mut store = PreferenceStore::with_font_defaults();
        store.set_string_pref(keys::FIXED_FONT_FAMILY, "Menlo", "").unwrap();
        store
            .set_managed(keys::FIXED_FONT_FAMILY, PrefValue::String("Consolas".into()))
            .unwrap();

        assert!(store.is_managed(keys::FIXED_FONT_FAMILY));
        assert_eq!(store.get_string(keys::FIXED_FONT_FAMILY).as_deref(), Some("Consolas"));
        assert!(matches!(
            store.set_string_pref(keys::FIXED_FONT_FAMILY, "Monaco", ""),
            Err(PrefError::Managed(_))
        ));
    }

    #[test]
    fn clear_user_value_restores_default() {
        let mut store = PreferenceStore::with_font_defaults();
        store.set_integer_pref(keys::DEFAULT_FONT_SIZE, 20, "").unwrap();
        let rx = store.observe();
        store.clear_user_value(keys::DEFAULT_FONT_SIZE).unwrap();
        assert_eq!(store.get_integer(keys::DEFAULT_FONT_SIZE), Some(16));
        assert_eq!(rx.try_recv().unwrap().value, PrefValue::Integer(16));
    }

    #[test]
    fn entries_list_every_registered_key() {
        let store = PreferenceStore::with_font_defaults();
        let entries = store.entries();
        assert_eq!(entries.len(), 8);
        assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
    }

    #[test]
    fn user_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("Preferences.json");

        let mut store = PreferenceStore::with_font_defaults();
        store.set_string_pref(keys::SERIF_FONT_FAMILY, "Georgia", "").unwrap();
        store.set_integer_pref(keys::MINIMUM_FONT_SIZE, 12, "").unwrap();
        store.save_user_file(&path).unwrap();

        let mut loaded = PreferenceStore::with_font_defaults();
        assert_eq!(loaded.load_user_file(&path).unwrap(), 2);
        assert_eq!(loaded.get_string(keys::SERIF_FONT_FAMILY).as_deref(), Some("Georgia"));
        assert_eq!(loaded.get_integer(keys::MINIMUM_FONT_SIZE), Some(12));
    }

    #[test]
    fn missing_user_file_is_not_an_error() {
        let mut store = PreferenceStore::with_font_defaults();
        let applied = store.load_user_file(Path::new("/nonexistent/Preferences.json")).unwrap();
        assert_eq!(applied, 0);
    }

    #[test]
    fn corrupt_user_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Preferences.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let mut store = PreferenceStore::with_font_defaults();
        assert!(matches!(store.load_user_file(&path), Err(PrefError::Json(_))));
    }

    #[test]
    fn stored_values_of_wrong_type_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Preferences.json");
        std::fs::write(
            &path,
            r#"{"webkit.webprefs.default_font_size": "huge", "intl.charset_default": "UTF-8", "x.y": 1}"#,
        )
        .unwrap();

        let mut store = PreferenceStore::with_font_defaults();
        assert_eq!(store.load_user_file(&path).unwrap(), 1);
        assert_eq!(store.get_string(keys::DEFAULT_CHARSET).as_deref(), Some("UTF-8"));
    }

    #[test]
    fn one_unreadable_entry_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Preferences.json");
        std::fs::write(
            &path,
            r#"{
                "webkit.webprefs.default_font_size": 16.5,
                "webkit.webprefs.minimum_font_size": 4294967296,
                "webkit.webprefs.fixed_font_family": null,
                "webkit.webprefs.default_fixed_font_size": true,
                "webkit.webprefs.serif_font_family": "Georgia"
            }"#,
        )
        .unwrap();

        let mut store = PreferenceStore::with_font_defaults();
        assert_eq!(store.load_user_file(&path).unwrap(), 1);
        assert_eq!(store.get_string(keys::SERIF_FONT_FAMILY).as_deref(), Some("Georgia"));
        assert_eq!(store.get_integer(keys::DEFAULT_FONT_SIZE), Some(16));
        assert_eq!(store.source(keys::MINIMUM_FONT_SIZE), Some(PrefSource::Default));
    }

    #[test]
    fn json_values_convert_by_kind() {
        use serde_json::json;
        assert_eq!(PrefValue::from_json(&json!(12)), Some(PrefValue::Integer(12)));
        assert_eq!(PrefValue::from_json(&json!(-3)), Some(PrefValue::Integer(-3)));
        assert_eq!(PrefValue::from_json(&json!("Arial")), Some(PrefValue::String("Arial".into())));
        assert_eq!(PrefValue::from_json(&json!(12.0)), None);
        assert_eq!(PrefValue::from_json(&json!(i64::from(i32::MAX) + 1)), None);
        assert_eq!(PrefValue::from_json(&json!([1])), None);
    }
}
