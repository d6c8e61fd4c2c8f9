use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ReturnView};

use super::helpers::{pad_to_width, spans_width};

const APP_NAME: &str = "pipeboard";
const HINTS: &str = "tab: leads \u{2022} t: tasks \u{2022} n: new lead \u{2022} q: quit \u{2022} ?: help";

const TABS: [(ReturnView, &str); 3] = [
    (ReturnView::Board, "Board"),
    (ReturnView::LeadList, "Leads"),
    (ReturnView::TaskList, "Tasks"),
];

/// Render the header: app name, screen tabs and key hints, with a
/// separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render the tab row and return the column of each tab separator.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default()
                .fg(app.theme.header)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
    ];
    let mut sep_cols = vec![spans_width(&spans) - 1];

    let current = app.top_level();
    for (view, label) in TABS {
        spans.push(Span::styled(format!(" {label} "), tab_style(app, view == current)));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    let width = area.width as usize;
    let used = spans_width(&spans);
    let hints_width = HINTS.chars().count() + 1;
    if used + hints_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - hints_width),
            bg_style,
        ));
        spans.push(Span::styled(HINTS, Style::default().fg(app.theme.dim).bg(bg)));
        spans.push(Span::styled(" ", bg_style));
    } else {
        pad_to_width(&mut spans, width, bg_style);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let line: String = (0..area.width as usize)
        .map(|col| {
            if sep_cols.contains(&col) {
                '\u{2534}'
            } else {
                '\u{2500}'
            }
        })
        .collect();
    let sep = Paragraph::new(line).style(
        Style::default()
            .fg(app.theme.border)
            .bg(app.theme.background),
    );
    frame.render_widget(sep, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
