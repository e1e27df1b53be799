//! Value-map slider: a UI range whose positions resolve to a fixed set of
//! permitted values.
//!
//! The UI range (`0..steps`) is usually denser than the value map. Each raw
//! position is interpolated linearly between the first and last permitted
//! value; a non-continuous slider then snaps to the nearest permitted value
//! (exact ties go to the lower one), a continuous slider rounds to the
//! nearest integer.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Font sizes offered by the serif and fixed-width size sliders.
pub const FONT_SIZES: [i32; 25] = [
    9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36, 40, 44, 48, 56, 64,
    72,
];

/// Font sizes offered by the minimum font size slider.
pub const MINIMUM_FONT_SIZES: [i32; 13] = [9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 20, 22, 24];

/// Slider configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliderError {
    #[error("value map is empty")]
    EmptyValueMap,

    #[error("value map is not strictly ascending at index {index} ({prev} then {next})")]
    NotAscending { index: usize, prev: i32, next: i32 },

    #[error("slider range must have at least one position")]
    EmptyRange,
}

/// Ordered set of the only legal values a non-continuous slider may report.
///
/// Never empty and strictly ascending; both are checked at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMap {
    values: Vec<i32>,
}

impl ValueMap {
    pub fn new(values: Vec<i32>) -> Result<Self, SliderError> {
        if values.is_empty() {
            return Err(SliderError::EmptyValueMap);
        }
        for (i, pair) in values.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SliderError::NotAscending {
                    index: i + 1,
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self { values })
    }

    /// Distance from the first to the last element.
    pub fn span(&self) -> i64 {
        i64::from(self.last()) - i64::from(self.first())
    }

    /// The 25 sizes shared by the serif and fixed-width sliders.
    pub fn font_sizes() -> Self {
        Self {
            values: FONT_SIZES.to_vec(),
        }
    }

    /// The 13 sizes of the minimum font size slider.
    pub fn minimum_font_sizes() -> Self {
        Self {
            values: MINIMUM_FONT_SIZES.to_vec(),
        }
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> i32 {
        self.values[0]
    }

    pub fn last(&self) -> i32 {
        self.values[self.values.len() - 1]
    }

    pub fn contains(&self, value: i32) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// Element closest to `target`. Exact ties resolve to the lower element.
    pub fn nearest(&self, target: f64) -> i32 {
        let idx = self.values.partition_point(|&v| (v as f64) < target);
        if idx == 0 {
            return self.first();
        }
        if idx == self.values.len() {
            return self.last();
        }
        let lower = self.values[idx - 1];
        let upper = self.values[idx];
        if target - lower as f64 <= upper as f64 - target {
            lower
        } else {
            upper
        }
    }
}

/// Identifies a slider, and the sample region it previews into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderId {
    SerifSize,
    FixedSize,
    MinimumSize,
}

impl SliderId {
    pub const ALL: [SliderId; 3] = [SliderId::SerifSize, SliderId::FixedSize, SliderId::MinimumSize];

    pub fn label(self) -> &'static str {
        match self {
            SliderId::SerifSize => "Serif size",
            SliderId::FixedSize => "Fixed-width size",
            SliderId::MinimumSize => "Minimum size",
        }
    }
}

/// Keyboard step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Decrease,
    Increase,
}

/// Change hook: `(source, mapped value)`.
pub type SliderHook = Box<dyn FnMut(SliderId, i32)>;

pub struct ValueMapSlider {
    id: SliderId,
    value_map: Arc<ValueMap>,
    continuous: bool,
    steps: u32,
    position: u32,
    value: i32,
    disabled: bool,
    notify_change: Option<SliderHook>,
    notify_pref_change: Option<SliderHook>,
}

impl ValueMapSlider {
    /// Slider with one UI position per integer between the first and last
    /// permitted value, capped at `u32::MAX` positions.
    pub fn new(id: SliderId, value_map: Arc<ValueMap>, continuous: bool) -> Self {
        let steps = u32::try_from(value_map.span() + 1).unwrap_or(u32::MAX);
        let value = value_map.first();
        Self {
            id,
            value_map,
            continuous,
            steps,
            position: 0,
            value,
            disabled: false,
            notify_change: None,
            notify_pref_change: None,
        }
    }

    pub fn with_steps(
        id: SliderId,
        value_map: Arc<ValueMap>,
        continuous: bool,
        steps: u32,
    ) -> Result<Self, SliderError> {
        if steps == 0 {
            return Err(SliderError::EmptyRange);
        }
        let mut slider = Self::new(id, value_map, continuous);
        slider.steps = steps;
        Ok(slider)
    }

    pub fn id(&self) -> SliderId {
        self.id
    }

    pub fn value_map(&self) -> &Arc<ValueMap> {
        &self.value_map
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    /// Last mapped value.
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_notify_change(&mut self, hook: SliderHook) {
        self.notify_change = Some(hook);
    }

    pub fn set_notify_pref_change(&mut self, hook: SliderHook) {
        self.notify_pref_change = Some(hook);
    }

    /// Position as a fraction of the UI range, for drawing.
    pub fn fraction(&self) -> f64 {
        if self.steps <= 1 {
            return 0.0;
        }
        self.position as f64 / (self.steps - 1) as f64
    }

    /// Value the UI range places at `position`, before snapping.
    pub fn interpolate(&self, position: u32) -> f64 {
        let first = self.value_map.first() as f64;
        if self.steps <= 1 {
            return first;
        }
        let p = position.min(self.steps - 1) as f64;
        first + self.value_map.span() as f64 * p / (self.steps - 1) as f64
    }

    /// Mapped value for a raw position.
    pub fn resolve(&self, position: u32) -> i32 {
        let interpolated = self.interpolate(position);
        if self.continuous {
            interpolated.round() as i32
        } else {
            self.value_map.nearest(interpolated)
        }
    }

    /// Apply raw user motion. Fires the hooks and returns the new value only
    /// when the mapped value changed.
    pub fn on_user_input(&mut self, raw_position: u32) -> Option<i32> {
        if self.disabled {
            return None;
        }
        self.position = raw_position.min(self.steps - 1);
        let mapped = self.resolve(self.position);
        if mapped == self.value {
            return None;
        }
        self.value = mapped;
        if let Some(hook) = self.notify_change.as_mut() {
            hook(self.id, mapped);
        }
        if let Some(hook) = self.notify_pref_change.as_mut() {
            hook(self.id, mapped);
        }
        Some(mapped)
    }

    /// Move to the nearest position whose mapped value differs from the
    /// current one, then apply it as user input.
    pub fn nudge(&mut self, step: Step) -> Option<i32> {
        if self.disabled {
            return None;
        }
        let value = self.value;
        let pos = match step {
            Step::Increase => {
                let p = self.count_positions(|v| v <= value);
                if p >= self.steps {
                    return None;
                }
                p
            }
            Step::Decrease => self.count_positions(|v| v < value).checked_sub(1)?,
        };
        self.on_user_input(pos)
    }

    /// Position the slider from a stored value. No hooks fire.
    ///
    /// Prefers the position proportional to the snapped value. When that
    /// maps elsewhere (a coarse range), the first position mapping to the
    /// snapped value is used, or failing that the one mapping closest to it.
    /// `value()` always equals `resolve(position())`.
    pub fn set_value(&mut self, value: i32) {
        let snapped = if self.continuous {
            value.clamp(self.value_map.first(), self.value_map.last())
        } else {
            self.value_map.nearest(value as f64)
        };
        let span = self.value_map.span();
        let estimate = if self.steps <= 1 || span == 0 {
            0
        } else {
            let frac = (i64::from(snapped) - i64::from(self.value_map.first())) as f64 / span as f64;
            (frac * (self.steps - 1) as f64).round() as u32
        };
        if self.resolve(estimate) == snapped {
            self.position = estimate;
            self.value = snapped;
            return;
        }
        let above = self.count_positions(|v| v < snapped);
        let position = if above >= self.steps {
            self.steps - 1
        } else if above == 0 || self.resolve(above) == snapped {
            above
        } else {
            let upper = i64::from(self.resolve(above)) - i64::from(snapped);
            let lower = i64::from(snapped) - i64::from(self.resolve(above - 1));
            if lower <= upper {
                above - 1
            } else {
                above
            }
        };
        self.position = position;
        self.value = self.resolve(position);
    }

    /// Number of leading positions whose mapped value satisfies `pred`.
    /// `resolve` is non-decreasing in the position, so this is a binary
    /// search.
    fn count_positions(&self, pred: impl Fn(i32) -> bool) -> u32 {
        let (mut lo, mut hi) = (0u64, u64::from(self.steps));
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            // mid < steps <= u32::MAX
            if pred(self.resolve(mid as u32)) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo as u32
    }
}

impl fmt::Debug for ValueMapSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueMapSlider")
            .field("id", &self.id)
            .field("continuous", &self.continuous)
            .field("steps", &self.steps)
            .field("position", &self.position)
            .field("value", &self.value)
            .field("disabled", &self.disabled)
            .field("notify_change", &self.notify_change.is_some())
            .field("notify_pref_change", &self.notify_pref_change.is_some())
            .finish()
    }
}
