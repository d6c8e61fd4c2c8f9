use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{Lead, Stage};
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::helpers::{pad_to_width, render_placeholder, scroll_start};

const MIN_COLUMN: usize = 22;
const MAX_COLUMN: usize = 36;
const SOURCE_WIDTH: usize = 12;

/// Width of one stage column for a board `width` cells wide.
pub fn column_width(width: usize, stages: usize) -> usize {
    let usable = width.saturating_sub(6);
    if usable < 40 {
        return 24;
    }
    if stages == 0 {
        return 26;
    }
    (usable / stages).clamp(MIN_COLUMN, MAX_COLUMN)
}

/// Render the pipeline board: one bordered column per stage, scrolled
/// horizontally so the selected stage is on screen.
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.pipeline;
    if !p.loaded {
        render_placeholder(frame, app, area, "Loading board\u{2026}");
        return;
    }
    if p.stages.is_empty() {
        render_placeholder(frame, app, area, "No stages found.");
        return;
    }

    let col_w = column_width(area.width as usize, p.stages.len());
    let visible = (area.width as usize / col_w).clamp(1, p.stages.len());
    let first = scroll_start(p.stage_index, visible);

    for (slot, stage) in p.stages.iter().enumerate().skip(first).take(visible) {
        let offset = (slot - first) * col_w;
        let x = area.x.saturating_add(offset as u16);
        let col_area = Rect {
            x,
            y: area.y,
            width: (col_w as u16).min(area.right().saturating_sub(x)),
            height: area.height,
        };
        if col_area.width == 0 {
            break;
        }
        render_column(frame, app, stage, slot == p.stage_index, col_area);
    }
}

fn render_column(frame: &mut Frame, app: &App, stage: &Stage, selected: bool, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let leads = app.pipeline.leads_in(stage.id);

    let border = if selected {
        theme.border_focus
    } else {
        theme.border
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", stage.name),
            Style::default()
                .fg(theme.stage_color(stage))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", leads.len()),
            Style::default().fg(theme.dim).bg(bg),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if leads.is_empty() {
        let empty = Paragraph::new(" (empty)").style(Style::default().fg(theme.dim).bg(bg));
        frame.render_widget(empty, inner);
        return;
    }

    let height = inner.height as usize;
    let width = inner.width as usize;
    let cursor = app.pipeline.lead_index;
    let start = if selected {
        scroll_start(cursor, height)
    } else {
        0
    };
    let lines: Vec<Line> = leads
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, lead)| card_line(app, lead, selected && i == cursor, width))
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

/// `name [type] • source`, the name cut to leave room for the type
fn card_line<'a>(app: &App, lead: &Lead, is_cursor: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let bg = if is_cursor { theme.selection_bg } else { theme.background };
    let mut name_style = Style::default().fg(theme.text_bright).bg(bg);
    if is_cursor {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            truncate_to_width(&lead.full_name, width.saturating_sub(4)),
            name_style,
        ),
        Span::styled(
            format!(" [{}]", lead.lead_type),
            Style::default().fg(theme.lead_type_color(&lead.lead_type)).bg(bg),
        ),
    ];
    if !lead.source.is_empty() {
        spans.push(Span::styled(
            format!(" \u{2022} {}", truncate_to_width(&lead.source, SOURCE_WIDTH)),
            Style::default().fg(theme.dim).bg(bg),
        ));
    }
    if is_cursor {
        pad_to_width(&mut spans, width, Style::default().bg(bg));
    }
    Line::from(spans)
}
