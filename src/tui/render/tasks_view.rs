use chrono::{Local, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::{hint_line, pad_to_width, render_placeholder, scroll_start, title_line};

/// Render every open follow-up across leads, two rows per task
pub fn render_tasks_view(frame: &mut Frame, app: &App, area: Rect) {
    render_tasks_as_of(frame, app, area, Local::now().date_naive());
}

fn render_tasks_as_of(frame: &mut Frame, app: &App, area: Rect, today: NaiveDate) {
    let theme = &app.theme;
    let bg = theme.background;
    let tasks = &app.tasks;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    frame.render_widget(Paragraph::new(title_line(theme, "Open Tasks")), chunks[0]);
    frame.render_widget(
        Paragraph::new(hint_line(
            theme,
            "enter: open lead \u{2022} c: complete \u{2022} esc: back",
        )),
        chunks[1],
    );

    let list_area = chunks[3];
    if !tasks.loaded {
        render_placeholder(frame, app, list_area, "Loading tasks\u{2026}");
        return;
    }
    if tasks.tasks.is_empty() {
        render_placeholder(frame, app, list_area, "No open tasks.");
        return;
    }

    let width = list_area.width as usize;
    let per_page = (list_area.height as usize / 2).max(1);
    let start = scroll_start(tasks.index, per_page);

    let mut lines: Vec<Line> = Vec::new();
    for (i, task) in tasks.tasks.iter().enumerate().skip(start).take(per_page) {
        let is_cursor = i == tasks.index;
        let row_bg = if is_cursor { theme.selection_bg } else { bg };
        let mut title_style = Style::default().fg(theme.text_bright).bg(row_bg);
        if is_cursor {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        let due_style = if task.is_due_by(today) {
            Style::default().fg(theme.red).bg(row_bg)
        } else {
            Style::default().fg(theme.dim).bg(row_bg)
        };

        let mut first = vec![
            Span::styled(
                if is_cursor { " \u{25B8} " } else { "   " },
                Style::default().fg(theme.header).bg(row_bg),
            ),
            Span::styled(task.title.clone(), title_style),
            Span::styled(" \u{2022} ", Style::default().fg(theme.dim).bg(row_bg)),
            Span::styled(
                task.due_label().unwrap_or_else(|| "No due date".to_string()),
                due_style,
            ),
        ];
        if is_cursor {
            pad_to_width(&mut first, width, Style::default().bg(row_bg));
        }
        lines.push(Line::from(first));
        lines.push(Line::from(Span::styled(
            format!("     Lead: {}", task.lead_name),
            Style::default().fg(theme.dim).bg(bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), list_area);
}
