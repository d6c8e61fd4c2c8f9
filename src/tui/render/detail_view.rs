use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{Task, TaskStatus};
use crate::tui::app::{AddTaskForm, App, DetailFocus, LeadDetailState, TaskField, TextField};
use crate::tui::theme::Theme;

use super::helpers::{
    field_spans, format_timestamp, hint_line, or_dash, pad_to_width, render_placeholder,
    scroll_start, title_line,
};

/// Render one lead with its follow-ups and notes. An open note or task form
/// sits in a box at the bottom.
pub fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        render_placeholder(frame, app, area, "Loading lead\u{2026}");
        return;
    };

    let form_height = match &detail.focus {
        DetailFocus::Tasks => 0,
        DetailFocus::Note(_) => 3,
        DetailFocus::Task(_) => 4,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(form_height)])
        .split(area);

    let (lines, cursor_line) = detail_lines(&app.theme, detail, chunks[0].width as usize);
    let scroll = cursor_line.map_or(0, |l| scroll_start(l, chunks[0].height as usize));
    let body = Paragraph::new(lines)
        .style(Style::default().bg(app.theme.background))
        .scroll((scroll as u16, 0));
    frame.render_widget(body, chunks[0]);

    match &detail.focus {
        DetailFocus::Tasks => {}
        DetailFocus::Note(form) => render_form(
            frame,
            &app.theme,
            chunks[1],
            " Add note ",
            vec![field_spans(&form.body, true, &app.theme)],
        ),
        DetailFocus::Task(form) => render_form(
            frame,
            &app.theme,
            chunks[1],
            " New follow-up ",
            task_form_lines(&app.theme, form),
        ),
    }
}

/// All body lines, plus the index of the selected task's line when the
/// task list holds focus.
fn detail_lines(
    theme: &Theme,
    detail: &LeadDetailState,
    width: usize,
) -> (Vec<Line<'static>>, Option<usize>) {
    let bg = theme.background;
    let lead = &detail.lead;
    let label = Style::default().fg(theme.dim).bg(bg);
    let value = Style::default().fg(theme.text).bg(bg);
    let section = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        title_line(theme, "Lead Detail"),
        Line::from(vec![
            Span::styled(" ", value),
            Span::styled(
                lead.lead_type.to_uppercase(),
                Style::default()
                    .fg(theme.lead_type_color(&lead.lead_type))
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ", value),
            Span::styled(lead.full_name.clone(), section),
        ]),
        Line::from(vec![
            Span::styled(" Stage: ", label),
            Span::styled(or_dash(&lead.stage_name).to_string(), value),
            Span::styled(" \u{2022} Source: ", label),
            Span::styled(or_dash(&lead.source).to_string(), value),
        ]),
        Line::from(vec![
            Span::styled(" Phone: ", label),
            Span::styled(or_dash(&lead.phone).to_string(), value),
            Span::styled(" \u{2022} Email: ", label),
            Span::styled(or_dash(&lead.email).to_string(), value),
        ]),
        Line::from(vec![
            Span::styled(" Updated: ", label),
            Span::styled(format_timestamp(&lead.updated_at), value),
        ]),
        Line::default(),
        Line::from(Span::styled(" Follow-ups (tasks)", section)),
        hint_line(
            theme,
            "f: new follow-up \u{2022} c: complete selected \u{2022} j/k: select",
        ),
    ];

    let mut cursor_line = None;
    if detail.tasks.is_empty() {
        lines.push(hint_line(theme, "(no follow-ups yet)"));
    }
    for (i, task) in detail.tasks.iter().enumerate() {
        let is_cursor = i == detail.task_index && detail.focus == DetailFocus::Tasks;
        if is_cursor {
            cursor_line = Some(lines.len());
        }
        lines.push(task_line(theme, task, is_cursor, width));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(" Notes", section)));
    if detail.notes.is_empty() {
        lines.push(hint_line(theme, "(no notes yet)"));
    }
    for note in &detail.notes {
        lines.push(Line::from(Span::styled(
            format!(" {}", format_timestamp(&note.created_at)),
            label,
        )));
        for body_line in note.body.lines() {
            lines.push(Line::from(Span::styled(format!("   {body_line}"), value)));
        }
    }

    lines.push(Line::default());
    lines.push(hint_line(theme, "a: add note \u{2022} esc: back \u{2022} q: quit"));
    (lines, cursor_line)
}

fn task_line(theme: &Theme, task: &Task, is_cursor: bool, width: usize) -> Line<'static> {
    let bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let done = task.status == TaskStatus::Done;
    let mut title_style = Style::default()
        .fg(if done { theme.dim } else { theme.text_bright })
        .bg(bg);
    if is_cursor {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let status_color = if done { theme.green } else { theme.yellow };

    let mut spans = vec![
        Span::styled(
            if is_cursor { " \u{25B8} " } else { "   " },
            Style::default().fg(theme.header).bg(bg),
        ),
        Span::styled(task.title.clone(), title_style),
        Span::styled(
            format!(
                " [{}] ",
                task.due_label().as_deref().unwrap_or("\u{2014}")
            ),
            Style::default().fg(theme.dim).bg(bg),
        ),
        Span::styled(
            task.status.as_str().to_uppercase(),
            Style::default().fg(status_color).bg(bg),
        ),
    ];
    if is_cursor {
        pad_to_width(&mut spans, width, Style::default().bg(bg));
    }
    Line::from(spans)
}

fn task_form_lines(theme: &Theme, form: &AddTaskForm) -> Vec<Vec<Span<'static>>> {
    let row = |label: &'static str, field: &TextField, focused: bool| {
        let style = if focused {
            Style::default()
                .fg(theme.header)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(theme.background)
        };
        let mut spans = vec![Span::styled(format!("{label:<7}"), style)];
        spans.extend(field_spans(field, focused, theme));
        spans
    };
    vec![
        row("Title", &form.title, form.field == TaskField::Title),
        row("Due", &form.due, form.field == TaskField::Due),
    ]
}

fn render_form(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    title: &'static str,
    rows: Vec<Vec<Span<'static>>>,
) {
    let bg = theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focus).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.header)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(
            " enter: next/save \u{2022} esc: cancel ",
            Style::default().fg(theme.dim).bg(bg),
        ))
        .style(Style::default().bg(bg));
    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
