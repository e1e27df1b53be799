//! Keyboard input: overlay first, then global keys, then the focused panel.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use fontprefs_core::Step;

use crate::app::{AppState, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    if app.overlay == Overlay::ErrorHistory {
        handle_error_overlay(app, key);
        return;
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return;
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.show_panel(panel);
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.show_panel(app.active_panel.prev());
            } else {
                app.show_panel(app.active_panel.next());
            }
            return;
        }
        KeyCode::BackTab => {
            app.show_panel(app.active_panel.prev());
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Fonts => handle_fonts_key(app, key),
        Panel::Preferences => handle_prefs_key(app, key),
        Panel::Help => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_fonts_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.focus = app.focus.down(),
        KeyCode::Char('k') | KeyCode::Up => app.focus = app.focus.up(),
        KeyCode::Char('h') | KeyCode::Left => app.adjust(Step::Decrease),
        KeyCode::Char('l') | KeyCode::Right => app.adjust(Step::Increase),
        _ => {}
    }
}

fn handle_prefs_key(app: &mut AppState, key: KeyEvent) {
    let row_count = app.pref_entries().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.prefs_cursor + 1 < row_count {
                app.prefs_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prefs_cursor = app.prefs_cursor.saturating_sub(1);
        }
        KeyCode::Char('r') => app.reset_selected_pref(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};

    use crossterm::event::KeyEventState;
    use fontprefs_core::{keys, LocalizedStrings, PreferenceBinding, PreferenceStore, SliderId};

    use crate::app::Control;
    use crate::worker::WorkerCommand;

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let app = AppState::new(
            cmd_tx,
            resp_rx,
            PreferenceStore::with_font_defaults(),
            LocalizedStrings::default(),
        );
        (app, cmd_rx)
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx) = app();
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn number_keys_switch_panels_and_fetch_on_fonts() {
        let (mut app, rx) = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_panel, Panel::Preferences);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.active_panel, Panel::Fonts);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn tab_cycles_panels() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel, Panel::Preferences);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_panel, Panel::Fonts);
    }

    #[test]
    fn jk_move_focus_and_l_nudges_slider() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.focus, Control::SerifSize);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.page.slider(SliderId::SerifSize).unwrap().value(), 17);
        assert_eq!(app.prefs.borrow().get_integer(keys::DEFAULT_FONT_SIZE), Some(17));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.focus, Control::SerifFamily);
    }

    #[test]
    fn error_overlay_swallows_keys() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_panel, Panel::Fonts);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn q_quits() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
