//! Help panel (3): keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-3", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "e", "Open error history");
    key(&mut lines, "q / Ctrl+C", "Quit (preferences are saved)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Fonts");
    key(&mut lines, "j / k", "Move focus down / up");
    key(&mut lines, "h / l", "Previous / next font, or smaller / larger size");
    key(&mut lines, "", "Font lists load the first time the panel is shown");
    key(&mut lines, "", "Choosing a serif font also sets the sans-serif font");
    key(&mut lines, "", "Controls managed by policy cannot be changed");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2: Preferences");
    key(&mut lines, "j / k", "Scroll preferences");
    key(&mut lines, "r", "Reset selected preference to its default");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
