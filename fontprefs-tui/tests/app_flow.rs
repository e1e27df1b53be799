//! End-to-end: app state, font worker and preference store wired together
//! the way `main` wires them, minus the terminal.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use fontprefs_core::{
    keys, ListId, LocalizedStrings, PrefValue, PreferenceBinding, PreferenceStore,
    StaticFontCatalog, Step,
};
use fontprefs_tui::app::{AppState, Control, Panel};
use fontprefs_tui::persistence::{self, PersistedState};
use fontprefs_tui::worker::{self, WorkerCommand};

struct Harness {
    app: AppState,
    cmd_tx: mpsc::Sender<WorkerCommand>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl Harness {
    fn new(store: PreferenceStore) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let catalog = StaticFontCatalog::new(["Times New Roman", "Georgia", "Courier New", "Arial"]);
        let worker = worker::spawn_worker(cmd_rx, resp_tx, Box::new(catalog)).unwrap();
        let app = AppState::new(cmd_tx.clone(), resp_rx, store, LocalizedStrings::default());
        Self {
            app,
            cmd_tx,
            worker: Some(worker),
        }
    }

    /// Pump the worker channel until the serif list is populated.
    fn wait_for_fonts(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.app.page.list(ListId::SerifFamily).unwrap().is_disabled() {
            assert!(Instant::now() < deadline, "font data never arrived");
            self.app.drain_worker();
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

#[test]
fn restoring_fonts_panel_loads_lists_with_current_selection() {
    let mut h = Harness::new(PreferenceStore::with_font_defaults());
    persistence::apply(&mut h.app, PersistedState::default());
    h.wait_for_fonts();

    let serif = h.app.page.list(ListId::SerifFamily).unwrap();
    assert_eq!(serif.len(), 4);
    assert_eq!(serif.selected_value(), Some("Times New Roman"));
    let fixed = h.app.page.list(ListId::FixedFamily).unwrap();
    assert_eq!(fixed.selected_value(), Some("Courier New"));
    let encoding = h.app.page.list(ListId::Encoding).unwrap();
    assert_eq!(encoding.selected_value(), Some("ISO-8859-1"));
}

#[test]
fn restoring_another_panel_defers_the_fetch() {
    let mut h = Harness::new(PreferenceStore::with_font_defaults());
    persistence::apply(
        &mut h.app,
        PersistedState {
            active_panel: Panel::Help,
            focus: Control::SerifFamily,
        },
    );
    std::thread::sleep(Duration::from_millis(50));
    h.app.drain_worker();
    assert!(h.app.page.list(ListId::SerifFamily).unwrap().is_disabled());

    h.app.show_panel(Panel::Fonts);
    h.wait_for_fonts();
}

#[test]
fn serif_change_round_trips_through_preferences_file() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("Preferences.json");

    {
        let mut h = Harness::new(PreferenceStore::with_font_defaults());
        h.app.show_panel(Panel::Fonts);
        h.wait_for_fonts();

        // Sorted list: Arial, Courier New, Georgia, Times New Roman
        h.app.focus = Control::SerifFamily;
        h.app.adjust(Step::Decrease);
        h.app.drain_pref_changes();
        h.app.prefs.borrow().save_user_file(&prefs_path).unwrap();
    }

    let mut store = PreferenceStore::with_font_defaults();
    assert_eq!(store.load_user_file(&prefs_path).unwrap(), 2);
    assert_eq!(store.get_string(keys::SERIF_FONT_FAMILY).as_deref(), Some("Georgia"));
    assert_eq!(
        store.get_string(keys::SANS_SERIF_FONT_FAMILY).as_deref(),
        Some("Georgia")
    );
}

#[test]
fn managed_encoding_stays_locked_after_load() {
    let mut store = PreferenceStore::with_font_defaults();
    store
        .set_managed(keys::DEFAULT_CHARSET, PrefValue::String("UTF-8".into()))
        .unwrap();
    let mut h = Harness::new(store);
    h.app.show_panel(Panel::Fonts);
    h.wait_for_fonts();

    let encoding = h.app.page.list(ListId::Encoding).unwrap();
    assert!(encoding.is_disabled());
    assert_eq!(encoding.selected_value(), Some("UTF-8"));

    h.app.focus = Control::Encoding;
    h.app.adjust(Step::Increase);
    assert_eq!(
        h.app.prefs.borrow().get_string(keys::DEFAULT_CHARSET).as_deref(),
        Some("UTF-8")
    );
}
