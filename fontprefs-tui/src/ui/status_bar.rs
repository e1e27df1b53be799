//! Bottom status bar: panel hints, font list state and focus on the Fonts
//! panel, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Panel, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " 1:Fonts 2:Preferences 3:Help e:Errors q:Quit",
        theme::muted(),
    )];
    spans.push(Span::raw(" | "));

    if app.active_panel == Panel::Fonts {
        spans.extend(fonts_context(app));
        spans.push(Span::raw(" | "));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn fonts_context(app: &AppState) -> Vec<Span<'static>> {
    let fetch = match app.fonts_loaded {
        Some(n) => Span::styled(format!("{n} fonts"), theme::positive()),
        None if app.page.has_shown() => Span::styled("loading fonts", theme::warning()),
        None => Span::styled("fonts not loaded", theme::muted()),
    };
    let mut spans = vec![
        fetch,
        Span::raw(" | "),
        Span::styled(app.focus.label(), theme::text()),
    ];
    if app.focus_is_managed() {
        spans.push(Span::styled(" [policy]", theme::warning()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use fontprefs_core::{keys, LocalizedStrings, PrefValue, PreferenceStore, SelectOption};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::app::Control;
    use crate::worker::WorkerResponse;

    fn bar(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 1)).unwrap();
        terminal.draw(|f| render(f, f.area(), app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn app_with(store: PreferenceStore) -> AppState {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        AppState::new(cmd_tx, resp_rx, store, LocalizedStrings::default())
    }

    #[test]
    fn tracks_font_fetch() {
        let mut app = app_with(PreferenceStore::with_font_defaults());
        assert!(bar(&app).contains("fonts not loaded"));

        app.show_panel(Panel::Fonts);
        assert!(bar(&app).contains("loading fonts"));

        app.handle_worker_response(WorkerResponse::FontsData {
            fonts: vec![SelectOption::new("Arial", "Arial"), SelectOption::new("Georgia", "Georgia")],
            encodings: vec![SelectOption::new("UTF-8", "Unicode (UTF-8)")],
            selected_values: vec![],
        });
        assert!(bar(&app).contains("2 fonts"));
    }

    #[test]
    fn marks_managed_focus() {
        let mut store = PreferenceStore::with_font_defaults();
        store
            .set_managed(keys::DEFAULT_FIXED_FONT_SIZE, PrefValue::Integer(14))
            .unwrap();
        let mut app = app_with(store);

        app.focus = Control::SerifSize;
        let text = bar(&app);
        assert!(text.contains("Serif size"));
        assert!(!text.contains("[policy]"));

        app.focus = Control::FixedSize;
        assert!(bar(&app).contains("Fixed-width size [policy]"));
    }

    #[test]
    fn page_context_only_on_fonts_panel() {
        let mut app = app_with(PreferenceStore::with_font_defaults());
        app.show_panel(Panel::Help);
        let text = bar(&app);
        assert!(!text.contains("fonts not loaded"));
        assert!(!text.contains("Serif"));
    }
}
