//! Color palette and the styles the panels draw with.
//!
//! # Color Palette
//! - **Accent**: cyan (focus, highlights, user-set values)
//! - **Positive**: green (loaded, success)
//! - **Negative**: pink (errors)
//! - **Warning**: orange (policy-managed values, alerts)
//! - **Neutral**: purple (section headers)
//! - **Muted**: steel blue (disabled controls, defaults, hints)

use ratatui::style::{Color, Modifier, Style};

use fontprefs_core::prefs::PrefSource;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }
}

impl Theme {
    /// Color for a preference value by where it comes from.
    pub fn source_color(&self, source: PrefSource) -> Color {
        match source {
            PrefSource::Managed => self.warning,
            PrefSource::User => self.accent,
            PrefSource::Default => self.muted,
        }
    }
}

fn palette() -> Theme {
    Theme::default()
}

pub fn accent() -> Style {
    Style::default().fg(palette().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(palette().positive)
}

pub fn negative() -> Style {
    Style::default().fg(palette().negative)
}

pub fn warning() -> Style {
    Style::default().fg(palette().warning)
}

pub fn neutral() -> Style {
    Style::default().fg(palette().neutral)
}

pub fn muted() -> Style {
    Style::default().fg(palette().muted)
}

pub fn text() -> Style {
    Style::default().fg(palette().text_primary)
}

pub fn source(source: PrefSource) -> Style {
    Style::default().fg(palette().source_color(source))
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}
