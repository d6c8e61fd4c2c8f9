use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Notice};
use crate::util::unicode::truncate_to_width;

/// Render the status row (bottom of screen): the single notice slot
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = (area.width as usize).saturating_sub(1);

    let line = match &app.notice {
        Some(Notice::Error(text)) => Line::from(Span::styled(
            truncate_to_width(&format!(" Error: {text}"), width),
            Style::default().fg(app.theme.red).bg(bg),
        )),
        Some(Notice::Status(text)) => Line::from(Span::styled(
            truncate_to_width(&format!(" {text}"), width),
            Style::default().fg(app.theme.green).bg(bg),
        )),
        None => Line::default(),
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
