//! Sample text preview for the size sliders and family lists.

/// Display state of one sample region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleRegion {
    text: String,
    font_size_pt: Option<i32>,
    font_family: Option<String>,
}

impl SampleRegion {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size_pt(&self) -> Option<i32> {
        self.font_size_pt
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }
}

/// Renders `"<size>pt: <sentence>"` into sample regions.
#[derive(Debug, Clone)]
pub struct SamplePreview {
    sentence: String,
}

impl SamplePreview {
    pub fn new(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
        }
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    /// Set text and size. The family changes only when one is given and
    /// non-empty; otherwise the last applied family stays.
    pub fn render(&self, target: &mut SampleRegion, size: i32, font_family: Option<&str>) {
        target.text = format!("{size}pt: {}", self.sentence);
        target.font_size_pt = Some(size);
        if let Some(family) = font_family.filter(|f| !f.is_empty()) {
            target.font_family = Some(family.to_string());
        }
    }
}
