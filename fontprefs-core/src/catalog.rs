//! Font family and character encoding catalog: the data behind the page's
//! selection lists.
//!
//! `SystemFontCatalog` enumerates installed families with fontdb. The scan
//! touches every font file on the system, which is why the page fetches it
//! lazily, once.

use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::select::SelectOption;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no font families found on this system")]
    NoFonts,
}

/// `(canonical name, display label)` of every encoding offered as the
/// default charset.
pub const ENCODINGS: &[(&str, &str)] = &[
    ("UTF-8", "Unicode (UTF-8)"),
    ("UTF-16LE", "Unicode (UTF-16LE)"),
    ("ISO-8859-1", "Western (ISO-8859-1)"),
    ("windows-1252", "Western (Windows-1252)"),
    ("ISO-8859-15", "Western (ISO-8859-15)"),
    ("macintosh", "Western (Macintosh)"),
    ("ISO-8859-2", "Central European (ISO-8859-2)"),
    ("windows-1250", "Central European (Windows-1250)"),
    ("ISO-8859-13", "Baltic (ISO-8859-13)"),
    ("windows-1257", "Baltic (Windows-1257)"),
    ("ISO-8859-4", "Baltic (ISO-8859-4)"),
    ("ISO-8859-14", "Celtic (ISO-8859-14)"),
    ("ISO-8859-10", "Nordic (ISO-8859-10)"),
    ("ISO-8859-3", "South European (ISO-8859-3)"),
    ("ISO-8859-16", "Romanian (ISO-8859-16)"),
    ("ISO-8859-5", "Cyrillic (ISO-8859-5)"),
    ("windows-1251", "Cyrillic (Windows-1251)"),
    ("KOI8-R", "Cyrillic (KOI8-R)"),
    ("KOI8-U", "Cyrillic (KOI8-U)"),
    ("IBM866", "Cyrillic (IBM866)"),
    ("ISO-8859-7", "Greek (ISO-8859-7)"),
    ("windows-1253", "Greek (Windows-1253)"),
    ("windows-1254", "Turkish (Windows-1254)"),
    ("ISO-8859-9", "Turkish (ISO-8859-9)"),
    ("ISO-8859-8", "Hebrew (ISO-8859-8)"),
    ("ISO-8859-8-I", "Hebrew (ISO-8859-8-I)"),
    ("windows-1255", "Hebrew (Windows-1255)"),
    ("ISO-8859-6", "Arabic (ISO-8859-6)"),
    ("windows-1256", "Arabic (Windows-1256)"),
    ("windows-874", "Thai (Windows-874)"),
    ("windows-1258", "Vietnamese (Windows-1258)"),
    ("GBK", "Simplified Chinese (GBK)"),
    ("gb18030", "Simplified Chinese (GB18030)"),
    ("Big5", "Traditional Chinese (Big5)"),
    ("Shift_JIS", "Japanese (Shift_JIS)"),
    ("EUC-JP", "Japanese (EUC-JP)"),
    ("ISO-2022-JP", "Japanese (ISO-2022-JP)"),
    ("EUC-KR", "Korean (EUC-KR)"),
];

pub fn encodings() -> Vec<SelectOption> {
    ENCODINGS
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect()
}

/// Source of the font family list.
pub trait FontCatalog {
    fn font_families(&self) -> Result<Vec<SelectOption>, CatalogError>;

    fn encodings(&self) -> Vec<SelectOption> {
        encodings()
    }
}

/// Installed fonts, via fontdb.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFontCatalog {
    /// Only list families with at least one monospaced face.
    pub monospace_only: bool,
}

impl FontCatalog for SystemFontCatalog {
    fn font_families(&self) -> Result<Vec<SelectOption>, CatalogError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!("fontdb loaded {} faces", db.len());

        let names = db
            .faces()
            .filter(|face| !self.monospace_only || face.monospaced)
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()));
        let families = dedup_families(names);
        if families.is_empty() {
            return Err(CatalogError::NoFonts);
        }
        Ok(families)
    }
}

/// A fixed family list, for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticFontCatalog {
    families: Vec<String>,
}

impl StaticFontCatalog {
    pub fn new<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: families.into_iter().map(Into::into).collect(),
        }
    }
}

impl FontCatalog for StaticFontCatalog {
    fn font_families(&self) -> Result<Vec<SelectOption>, CatalogError> {
        let families = dedup_families(self.families.iter().cloned());
        if families.is_empty() {
            return Err(CatalogError::NoFonts);
        }
        Ok(families)
    }
}

/// Case-insensitive dedup and sort; the first spelling seen wins.
fn dedup_families(names: impl Iterator<Item = String>) -> Vec<SelectOption> {
    let mut by_key: BTreeMap<String, String> = BTreeMap::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        by_key
            .entry(trimmed.to_lowercase())
            .or_insert_with(|| trimmed.to_string());
    }
    by_key
        .into_values()
        .map(|name| SelectOption::new(name.clone(), name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_catalog_sorts_and_dedups() {
        let catalog = StaticFontCatalog::new(["Verdana", "arial", "Arial", "  ", "Georgia"]);
        let values: Vec<String> = catalog
            .font_families()
            .unwrap()
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec!["arial", "Georgia", "Verdana"]);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let catalog = StaticFontCatalog::default();
        assert!(matches!(catalog.font_families(), Err(CatalogError::NoFonts)));
    }

    #[test]
    fn encodings_have_unique_values() {
        let list = encodings();
        let mut values: Vec<&str> = list.iter().map(|o| o.value.as_str()).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), ENCODINGS.len());
        assert!(list.iter().any(|o| o.value == "ISO-8859-1"));
    }
}
