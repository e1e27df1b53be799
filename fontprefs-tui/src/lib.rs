//! fontprefs TUI: terminal front-end for the Fonts and Encoding page.
//!
//! Panels:
//! 1. Fonts: family lists, size sliders, sample text, encoding
//! 2. Preferences: every font preference with its source
//! 3. Help: keyboard shortcuts

pub mod app;
pub mod host;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::{AppState, Control, Panel};
pub use theme::Theme;
