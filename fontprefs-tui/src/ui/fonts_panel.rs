//! Fonts panel (1): family lists, size sliders with sample text, encoding.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use fontprefs_core::{ListId, SampleRegion, SliderId};

use crate::app::{AppState, Control};
use crate::theme;
use crate::ui::widgets::slider::slider_bar;

const BAR_WIDTH: usize = 24;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "[j/k]focus [h/l]change",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    for control in Control::ALL {
        let focused = control == app.focus;
        if let Some(id) = control.list() {
            lines.push(list_line(app, id, focused));
        } else if let Some(id) = control.slider() {
            lines.push(slider_line(app, id, focused));
            lines.push(sample_line(&app.page.sample(id)));
            lines.push(Line::from(""));
        }
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn label_span(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        theme::accent().add_modifier(Modifier::REVERSED)
    } else {
        theme::neutral()
    };
    Span::styled(format!("{label:>18}: "), style)
}

fn list_line(app: &AppState, id: ListId, focused: bool) -> Line<'static> {
    let mut spans = vec![label_span(id.label(), focused)];
    let Some(list) = app.page.list(id) else {
        return Line::from(spans);
    };

    let shown = list
        .selected_option()
        .or_else(|| list.options().first().filter(|_| list.is_disabled()))
        .map(|o| o.label.clone())
        .unwrap_or_else(|| "(none)".to_string());
    let style = if list.is_disabled() {
        theme::muted()
    } else if focused {
        theme::accent()
    } else {
        theme::text()
    };
    spans.push(Span::styled(format!("< {shown} >"), style));
    if list.is_managed() {
        spans.push(Span::styled(" [managed]", theme::warning()));
    } else if !list.is_disabled() {
        if let Some(i) = list.selected_index() {
            spans.push(Span::styled(
                format!("  {}/{}", i + 1, list.len()),
                theme::muted(),
            ));
        }
    }
    Line::from(spans)
}

fn slider_line(app: &AppState, id: SliderId, focused: bool) -> Line<'static> {
    let mut spans = vec![label_span(id.label(), focused)];
    let Some(slider) = app.page.slider(id) else {
        return Line::from(spans);
    };

    let style = if slider.is_disabled() {
        theme::muted()
    } else if focused {
        theme::accent()
    } else {
        theme::text()
    };
    spans.push(Span::styled(slider_bar(slider, BAR_WIDTH), style));
    spans.push(Span::styled(format!(" {}pt", slider.value()), style));
    if slider.is_disabled() {
        spans.push(Span::styled(" [managed]", theme::warning()));
    }
    Line::from(spans)
}

fn sample_line(sample: &SampleRegion) -> Line<'static> {
    let family = sample.font_family().unwrap_or("default");
    Line::from(vec![
        Span::raw(" ".repeat(20)),
        Span::styled(
            sample.text().to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
        Span::styled(format!("  ({family})"), theme::muted()),
    ])
}
