//! Preferences panel (2): every font preference, its value and source.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "[j/k]scroll [r]reset to default",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    for (i, entry) in app.pref_entries().into_iter().enumerate() {
        let key_style = if i == app.prefs_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<44}", entry.key.as_str()), key_style),
            Span::styled(format!("{:<24}", entry.value.to_string()), theme::source(entry.source)),
            Span::styled(format!("[{}]", entry.source.label()), theme::muted()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
