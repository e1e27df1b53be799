//! fontprefs core: the Fonts and Encoding settings page, independent of any
//! UI toolkit.
//!
//! - Value-map sliders that snap a dense UI range onto permitted font sizes
//! - Sample text preview regions
//! - Selection lists for font families and encodings
//! - Preference binding with policy-managed (locked) values
//! - The page controller with its one-time lazy font catalog fetch
//! - System font enumeration and the encoding list

pub mod catalog;
pub mod config;
pub mod page;
pub mod policy;
pub mod prefs;
pub mod sample;
pub mod select;
pub mod slider;
pub mod strings;

pub use catalog::{FontCatalog, StaticFontCatalog, SystemFontCatalog};
pub use config::AppConfig;
pub use page::{FontDataHost, FontSettings, ListId, Page, PageState};
pub use policy::Policy;
pub use prefs::{keys, PrefChange, PrefValue, PreferenceBinding, PreferenceKey, PreferenceStore};
pub use sample::{SamplePreview, SampleRegion};
pub use select::{SelectOption, SelectionList};
pub use slider::{SliderId, Step, ValueMap, ValueMapSlider};
pub use strings::LocalizedStrings;
