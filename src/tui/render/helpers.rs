use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, TextField};
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// First row to draw so that `cursor` stays inside a window of `visible` rows.
pub(super) fn scroll_start(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    cursor.saturating_sub(visible - 1)
}

/// Right-pad a line's spans with `style` out to `width` cells.
pub(super) fn pad_to_width(spans: &mut Vec<Span<'_>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// A single dim line of text filling `area`; used for loading and empty states.
pub(super) fn render_placeholder(frame: &mut Frame, app: &App, area: Rect, text: &str) {
    let p = Paragraph::new(format!(" {text}"))
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(p, area);
}

/// Key hints, dimmed
pub(super) fn hint_line(theme: &Theme, text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(theme.dim).bg(theme.background),
    ))
}

pub(super) fn title_line(theme: &Theme, text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {text}"),
        Style::default()
            .fg(theme.header)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Spans for a text input. A focused field shows a block cursor; an empty
/// field shows its placeholder.
pub(super) fn field_spans(field: &TextField, focused: bool, theme: &Theme) -> Vec<Span<'static>> {
    let bg = theme.background;
    let text_style = Style::default().fg(theme.text_bright).bg(bg);
    let placeholder_style = Style::default().fg(theme.dim).bg(bg);
    let cursor_style = Style::default().fg(theme.header).bg(bg);

    let mut spans = Vec::new();
    if !focused {
        if field.value.is_empty() {
            spans.push(Span::styled(field.placeholder, placeholder_style));
        } else {
            spans.push(Span::styled(field.value.clone(), text_style));
        }
        return spans;
    }

    let cursor = field.cursor.min(field.value.len());
    let (before, after) = field.value.split_at(cursor);
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), text_style));
    }
    spans.push(Span::styled("\u{258C}", cursor_style));
    if !after.is_empty() {
        spans.push(Span::styled(after.to_string(), text_style));
    } else if field.value.is_empty() {
        spans.push(Span::styled(field.placeholder, placeholder_style));
    }
    spans
}

/// Timestamp as shown to the user: local time to the minute
pub(super) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// `value`, or an em dash for empty strings
pub(super) fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "\u{2014}"
    } else {
        value
    }
}
