//! Horizontal slider bar for the size sliders.

use fontprefs_core::ValueMapSlider;

/// `[====      ]` with `fraction` of `width` filled.
pub fn render_bar(fraction: f64, width: usize) -> String {
    let frac = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (frac * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

/// Bar for a slider's raw position.
pub fn slider_bar(slider: &ValueMapSlider, width: usize) -> String {
    render_bar(slider.fraction(), width)
}
