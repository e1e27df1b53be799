//! UI state persistence: JSON save/load across restarts.
//!
//! Preference values go to their own file through the preference store;
//! `load_preferences`/`save_preferences` wrap that for the app.

use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use fontprefs_core::{Policy, PreferenceStore};

use crate::app::{AppState, Control, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub focus: Control,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Fonts,
            focus: Control::SerifFamily,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        focus: app.focus,
    }
}

/// Apply persisted state. Restoring the Fonts panel counts as showing it.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.focus = state.focus;
    app.show_panel(state.active_panel);
}

/// Preference store as loaded at startup.
pub struct LoadedPreferences {
    pub store: PreferenceStore,
    /// False when the preferences file exists but could not be read.
    pub save_on_exit: bool,
}

/// Defaults, then the user's saved values, then policy on top.
pub fn load_preferences(prefs_path: &Path, policy_path: &Path) -> LoadedPreferences {
    let mut store = PreferenceStore::with_font_defaults();
    let save_on_exit = match store.load_user_file(prefs_path) {
        Ok(n) => {
            info!("{n} saved preferences from {}", prefs_path.display());
            true
        }
        Err(e) => {
            warn!(
                "ignoring {}: {e}; it will not be overwritten",
                prefs_path.display()
            );
            false
        }
    };
    match Policy::load(policy_path) {
        Ok(policy) => {
            policy.apply(&mut store);
        }
        Err(e) => warn!("ignoring policy: {e}"),
    }
    LoadedPreferences {
        store,
        save_on_exit,
    }
}

/// Write the user's values back, unless the file was unreadable at startup.
/// Returns whether the file was written.
pub fn save_preferences(
    store: &PreferenceStore,
    path: &Path,
    save_on_exit: bool,
) -> anyhow::Result<bool> {
    if !save_on_exit {
        warn!("not saving preferences: {} was unreadable at startup", path.display());
        return Ok(false);
    }
    store
        .save_user_file(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(true)
}
