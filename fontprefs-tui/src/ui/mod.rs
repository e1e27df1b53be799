//! Top-level UI layout: one panel at a time with a status bar.

pub mod fonts_panel;
pub mod help_panel;
pub mod overlays;
pub mod prefs_panel;
pub mod status_bar;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use fontprefs_core::Page;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    if app.overlay == Overlay::ErrorHistory {
        overlays::render_error_history(f, main_area, app);
    }
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;
    let title = match panel {
        Panel::Fonts => app.page.title(),
        _ => panel.label(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {title} [{}] ", panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Fonts => fonts_panel::render(f, inner, app),
        Panel::Preferences => prefs_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use fontprefs_core::{LocalizedStrings, PreferenceStore};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> AppState {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        AppState::new(
            cmd_tx,
            resp_rx,
            PreferenceStore::with_font_defaults(),
            LocalizedStrings::default(),
        )
    }

    #[test]
    fn fonts_panel_shows_title_placeholder_and_sizes() {
        let text = screen(&app());
        assert!(text.contains("Fonts and Encoding"));
        assert!(text.contains("(loading)"));
        assert!(text.contains("16pt"));
    }

    #[test]
    fn every_panel_draws() {
        let mut app = app();
        for panel in [Panel::Preferences, Panel::Help] {
            app.show_panel(panel);
            assert!(screen(&app).contains(panel.label()));
        }
        app.overlay = Overlay::ErrorHistory;
        assert!(screen(&app).contains("No errors recorded."));
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(80, 70, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    }
}
