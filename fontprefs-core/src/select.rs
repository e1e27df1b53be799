//! Selection lists for the font family and encoding pickers.

use serde::{Deserialize, Serialize};

/// One `(value, label)` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for SelectOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// Options plus the current selection.
///
/// Starts disabled: nothing can be picked until the list is populated.
/// A managed list stays disabled no matter how often it is repopulated.
#[derive(Debug, Clone)]
pub struct SelectionList {
    options: Vec<SelectOption>,
    selected: Option<usize>,
    disabled: bool,
    managed: bool,
}

impl Default for SelectionList {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionList {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            selected: None,
            disabled: true,
            managed: false,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected_option().map(|o| o.value.as_str())
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_managed(&self) -> bool {
        self.managed
    }

    /// Lock (or unlock) the list by policy. Locking disables it.
    pub fn set_managed(&mut self, managed: bool) {
        self.managed = managed;
        if managed {
            self.disabled = true;
        }
    }

    /// Add one entry without touching the selection or enabled state.
    pub fn append(&mut self, option: SelectOption) {
        self.options.push(option);
    }

    /// Replace every entry and select the one whose value matches
    /// `selected_value`. Enables the list unless it is managed.
    pub fn populate(&mut self, items: &[SelectOption], selected_value: Option<&str>) {
        self.options = items.to_vec();
        self.selected = None;
        if let Some(wanted) = selected_value {
            self.selected = self.options.iter().position(|o| o.value == wanted);
        }
        if !self.managed {
            self.disabled = false;
        }
    }

    /// User pick. Ignored when disabled or out of range.
    pub fn select(&mut self, index: usize) -> Option<&SelectOption> {
        if self.disabled || index >= self.options.len() {
            return None;
        }
        self.selected = Some(index);
        self.options.get(index)
    }

    /// Programmatic selection by value; clears the selection on a miss.
    pub fn select_value(&mut self, value: &str) {
        self.selected = self.options.iter().position(|o| o.value == value);
    }
}
