//! Application state, owned by the main thread.
//!
//! The page and the preference store live here. The worker thread
//! communicates via channels; preference changes arrive on an observer
//! channel and are drained once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use fontprefs_core::prefs::PrefEntry;
use fontprefs_core::{
    FontSettings, ListId, LocalizedStrings, Page, PrefChange, PreferenceBinding, PreferenceStore,
    SliderId, Step,
};

use crate::host::ChannelHost;
use crate::worker::{WorkerCommand, WorkerResponse};

pub type FontsPage = FontSettings<ChannelHost, PreferenceStore>;

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Fonts,
    Preferences,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Fonts => 0,
            Panel::Preferences => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Fonts),
            1 => Some(Panel::Preferences),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Fonts => "Fonts",
            Panel::Preferences => "Preferences",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        match self {
            Panel::Fonts => Panel::Preferences,
            Panel::Preferences => Panel::Help,
            Panel::Help => Panel::Fonts,
        }
    }

    pub fn prev(self) -> Panel {
        match self {
            Panel::Fonts => Panel::Help,
            Panel::Preferences => Panel::Fonts,
            Panel::Help => Panel::Preferences,
        }
    }
}

/// Focusable control on the Fonts panel, in screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    SerifFamily,
    SerifSize,
    FixedFamily,
    FixedSize,
    MinimumSize,
    Encoding,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::SerifFamily,
        Control::SerifSize,
        Control::FixedFamily,
        Control::FixedSize,
        Control::MinimumSize,
        Control::Encoding,
    ];

    pub fn slider(self) -> Option<SliderId> {
        match self {
            Control::SerifSize => Some(SliderId::SerifSize),
            Control::FixedSize => Some(SliderId::FixedSize),
            Control::MinimumSize => Some(SliderId::MinimumSize),
            _ => None,
        }
    }

    pub fn list(self) -> Option<ListId> {
        match self {
            Control::SerifFamily => Some(ListId::SerifFamily),
            Control::FixedFamily => Some(ListId::FixedFamily),
            Control::Encoding => Some(ListId::Encoding),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match (self.slider(), self.list()) {
            (Some(id), _) => id.label(),
            (_, Some(id)) => id.label(),
            _ => "",
        }
    }

    fn position(self) -> usize {
        Control::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next control down, stopping at the last one.
    pub fn down(self) -> Control {
        Control::ALL[(self.position() + 1).min(Control::ALL.len() - 1)]
    }

    /// Next control up, stopping at the first one.
    pub fn up(self) -> Control {
        Control::ALL[self.position().saturating_sub(1)]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Catalog,
    Prefs,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Catalog => "FONT",
            ErrorCategory::Prefs => "PREF",
            ErrorCategory::Other => "ERR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Fonts panel
    pub page: FontsPage,
    pub focus: Control,
    /// Families in the last font data response.
    pub fonts_loaded: Option<usize>,

    // Preferences panel
    pub prefs: Rc<RefCell<PreferenceStore>>,
    pub prefs_cursor: usize,
    pub pref_rx: Receiver<PrefChange>,

    // Worker communication
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    /// Build the app around `prefs` and initialize the Fonts page. The page
    /// is not shown yet; call [`AppState::show_panel`] for that.
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        mut prefs: PreferenceStore,
        strings: LocalizedStrings,
    ) -> Self {
        let pref_rx = prefs.observe();
        let prefs = Rc::new(RefCell::new(prefs));
        let host = ChannelHost::new(worker_tx, prefs.clone());
        let mut page = FontSettings::new(host, prefs.clone(), strings);
        page.initialize_page();
        page.on_preferences_changed();

        Self {
            active_panel: Panel::Fonts,
            running: true,
            page,
            focus: Control::SerifFamily,
            fonts_loaded: None,
            prefs,
            prefs_cursor: 0,
            pref_rx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Switch panels. Showing the Fonts panel notifies the page every time;
    /// the page itself decides whether a fetch is needed.
    pub fn show_panel(&mut self, panel: Panel) {
        self.active_panel = panel;
        if panel == Panel::Fonts {
            self.page.did_show_page();
        }
    }

    /// Nudge the focused slider or move the focused list's selection.
    pub fn adjust(&mut self, step: Step) {
        if let Some(id) = self.focus.slider() {
            self.adjust_slider(id, step);
        } else if let Some(id) = self.focus.list() {
            self.adjust_list(id, step);
        }
    }

    fn adjust_slider(&mut self, id: SliderId, step: Step) {
        let disabled = self.page.slider(id).is_some_and(|s| s.is_disabled());
        if disabled {
            self.set_warning(format!("{} is managed by policy", id.label()));
            return;
        }
        if let Some(value) = self.page.nudge_slider(id, step) {
            self.set_status(format!("{}: {value}pt", id.label()));
        }
    }

    fn adjust_list(&mut self, id: ListId, step: Step) {
        let Some(list) = self.page.list(id) else {
            return;
        };
        if list.is_managed() {
            self.set_warning(format!("{} is managed by policy", id.label()));
            return;
        }
        if list.is_disabled() {
            self.set_warning("Font list is still loading");
            return;
        }
        let last = list.len().saturating_sub(1);
        let index = match (list.selected_index(), step) {
            (None, _) => 0,
            (Some(i), Step::Increase) => (i + 1).min(last),
            (Some(i), Step::Decrease) => i.saturating_sub(1),
        };
        if list.selected_index() == Some(index) {
            return;
        }
        if let Some(value) = self.page.on_selection_changed(id, index) {
            self.set_status(format!("{}: {value}", id.label()));
        }
    }

    /// Whether policy locks the focused control.
    pub fn focus_is_managed(&self) -> bool {
        if let Some(id) = self.focus.slider() {
            self.page.slider(id).is_some_and(|s| s.is_disabled())
        } else if let Some(id) = self.focus.list() {
            self.page.list(id).is_some_and(|l| l.is_managed())
        } else {
            false
        }
    }

    /// Every registered preference, for the Preferences panel.
    pub fn pref_entries(&self) -> Vec<PrefEntry> {
        self.prefs.borrow().entries()
    }

    /// Drop the user value under the Preferences cursor.
    pub fn reset_selected_pref(&mut self) {
        let Some(entry) = self.pref_entries().into_iter().nth(self.prefs_cursor) else {
            return;
        };
        if self.prefs.borrow().is_managed(entry.key.as_str()) {
            self.set_warning(format!("{} is managed by policy", entry.key));
            return;
        }
        let result = self.prefs.borrow_mut().clear_user_value(entry.key.as_str());
        match result {
            Ok(()) => self.set_status(format!("Reset {}", entry.key)),
            Err(e) => self.push_error(ErrorCategory::Prefs, e.to_string(), entry.key.to_string()),
        }
    }

    /// Apply every pending worker response.
    pub fn drain_worker(&mut self) {
        while let Ok(resp) = self.worker_rx.try_recv() {
            self.handle_worker_response(resp);
        }
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::FontsData {
                fonts,
                encodings,
                selected_values,
            } => {
                self.page
                    .on_fonts_data_received(&fonts, &encodings, &selected_values);
                self.fonts_loaded = Some(fonts.len());
                self.set_status(format!(
                    "Loaded {} font families, {} encodings",
                    fonts.len(),
                    encodings.len()
                ));
            }
            WorkerResponse::Error { message, context } => {
                self.push_error(ErrorCategory::Catalog, message, context);
            }
        }
    }

    /// Resync the page once if any preference changed since the last call.
    pub fn drain_pref_changes(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(change) = self.pref_rx.try_recv() {
            debug!("{} = {} ({:?})", change.key, change.value, change.origin);
            changed += 1;
        }
        if changed > 0 {
            self.page.on_preferences_changed();
        }
        changed
    }

    pub fn quit(&mut self) {
        info!("quit requested");
        self.running = false;
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
