//! Administrative policy: preferences forced to fixed values.
//!
//! ```toml
//! [managed]
//! "webkit.webprefs.fixed_font_family" = "Consolas"
//! "webkit.webprefs.minimum_font_size" = 12
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::prefs::{PrefValue, PreferenceStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub managed: BTreeMap<String, PrefValue>,
}

impl Policy {
    /// Load from `path`. A missing file means no policy.
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

    /// Lock every listed preference in `store`. Entries the store rejects
    /// are logged and skipped. Returns how many were applied.
    pub fn apply(&self, store: &mut PreferenceStore) -> usize {
        let mut applied = 0;
        for (key, value) in &self.managed {
            match store.set_managed(key, value.clone()) {
                Ok(()) => applied += 1,
                Err(e) => warn!("ignoring policy entry: {e}"),
            }
        }
        if applied > 0 {
            info!("{applied} preferences managed by policy");
        }
        applied
    }
}
