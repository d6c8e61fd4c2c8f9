pub mod board_view;
pub mod detail_view;
pub mod header;
pub mod help_view;
mod helpers;
pub mod leads_view;
pub mod new_lead_view;
pub mod status_row;
pub mod tasks_view;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::{App, View};

/// Main render function: header, the active screen, then the notice row.
/// Reads `app` only.
///
/// An area with no cells has no room for even a "Loading…" line, so a
/// zero-width or zero-height viewport draws nothing. Every other size gets
/// the full layout, clipped.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    match app.view {
        View::Board => board_view::render_board_view(frame, app, chunks[1]),
        View::LeadList => leads_view::render_leads_view(frame, app, chunks[1]),
        View::LeadDetail => detail_view::render_detail_view(frame, app, chunks[1]),
        View::NewLead => new_lead_view::render_new_lead_view(frame, app, chunks[1]),
        View::TaskList => tasks_view::render_tasks_view(frame, app, chunks[1]),
        View::Help => help_view::render_help_view(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans(
    spans: &mut Vec<Span<'_>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        last_end = m.end();
    }
    if last_end == 0 || last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
