//! Application configuration (TOML) and default file locations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strings::LocalizedStrings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `config.toml` contents. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log filter, e.g. `"info"` or `"fontprefs_core=debug"`.
    pub log_level: String,
    /// Preferences JSON file. Defaults to `<config dir>/Preferences.json`.
    pub prefs_path: Option<PathBuf>,
    /// UI state JSON file. Defaults to `<config dir>/state.json`.
    pub state_path: Option<PathBuf>,
    /// Policy TOML file. Defaults to `<config dir>/policy.toml`.
    pub policy_path: Option<PathBuf>,
    /// Localized string overrides keyed by string id.
    pub strings: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            prefs_path: None,
            state_path: None,
            policy_path: None,
            strings: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn prefs_path(&self, config_dir: &Path) -> PathBuf {
        self.prefs_path
            .clone()
            .unwrap_or_else(|| config_dir.join("Preferences.json"))
    }

    pub fn state_path(&self, config_dir: &Path) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| config_dir.join("state.json"))
    }

    pub fn policy_path(&self, config_dir: &Path) -> PathBuf {
        self.policy_path
            .clone()
            .unwrap_or_else(|| config_dir.join("policy.toml"))
    }

    pub fn strings(&self) -> LocalizedStrings {
        LocalizedStrings::with_overrides(&self.strings)
    }
}

/// `<platform config dir>/fontprefs`, or `./fontprefs` when the platform
/// has none.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fontprefs")
}

/// `<platform cache dir>/fontprefs/logs`.
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fontprefs")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings;

    #[test]
    fn missing_file_returns_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
log_level = "debug"

[strings]
fontSettingsPlaceholder = "(wait)"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.prefs_path.is_none());
        assert_eq!(config.strings().get(strings::PLACEHOLDER), "(wait)");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = [").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn paths_default_into_config_dir() {
        let config = AppConfig::default();
        let base = Path::new("/tmp/fp");
        assert_eq!(config.prefs_path(base), base.join("Preferences.json"));
        assert_eq!(config.policy_path(base), base.join("policy.toml"));
    }
}
