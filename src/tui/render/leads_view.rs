use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, LeadsFocus};

use super::helpers::{
    field_spans, hint_line, pad_to_width, render_placeholder, scroll_start, title_line,
};
use super::push_highlighted_spans;

const HINT: &str = "Type / to search \u{2022} Enter applies search \u{2022} Enter on a lead opens details \u{2022} esc back";

/// Render the searchable lead list
pub fn render_leads_view(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let leads = &app.leads;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // search box
            Constraint::Length(1), // hint
            Constraint::Length(1),
            Constraint::Min(0), // rows
        ])
        .split(area);

    frame.render_widget(Paragraph::new(title_line(theme, "Leads")), chunks[0]);

    let searching = leads.focus == LeadsFocus::Search;
    let label_style = if searching {
        Style::default()
            .fg(theme.header)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim).bg(bg)
    };
    let mut search = vec![Span::styled(" / ", label_style)];
    search.extend(field_spans(&leads.search, searching, theme));
    frame.render_widget(
        Paragraph::new(Line::from(search)).style(Style::default().bg(bg)),
        chunks[1],
    );
    frame.render_widget(Paragraph::new(hint_line(theme, HINT)), chunks[2]);

    let list_area = chunks[4];
    if !leads.loaded {
        render_placeholder(frame, app, list_area, "Loading leads\u{2026}");
        return;
    }
    if leads.leads.is_empty() {
        let text = if leads.query.is_empty() {
            "No leads yet.".to_string()
        } else {
            format!("No leads match \"{}\".", leads.query)
        };
        render_placeholder(frame, app, list_area, &text);
        return;
    }

    let re = leads.highlight_re();
    let match_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let height = list_area.height as usize;
    let width = list_area.width as usize;
    let start = scroll_start(leads.index, height);

    let lines: Vec<Line> = leads
        .leads
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, lead)| {
            let is_cursor = i == leads.index && !searching;
            let row_bg = if is_cursor { theme.selection_bg } else { bg };
            let mut name_style = Style::default().fg(theme.text_bright).bg(row_bg);
            if is_cursor {
                name_style = name_style.add_modifier(Modifier::BOLD);
            }

            let mut spans = vec![Span::styled(
                if is_cursor { " \u{25B8} " } else { "   " },
                Style::default().fg(theme.header).bg(row_bg),
            )];
            push_highlighted_spans(&mut spans, &lead.full_name, name_style, match_style, re.as_ref());
            spans.push(Span::styled("  ", Style::default().bg(row_bg)));
            spans.push(Span::styled(
                lead.lead_type.to_uppercase(),
                Style::default()
                    .fg(theme.lead_type_color(&lead.lead_type))
                    .bg(row_bg),
            ));
            spans.push(Span::styled(
                format!(" \u{2022} {}", lead.stage_name),
                Style::default().fg(theme.dim).bg(row_bg),
            ));
            if is_cursor {
                pad_to_width(&mut spans, width, Style::default().bg(row_bg));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), list_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::fixtures::lead;
    use crate::tui::render::test_helpers::{TERM_W, render_to_string};
    use crate::tui::theme::Theme;

    fn render(app: &App, h: u16) -> String {
        render_to_string(TERM_W, h, |frame, area| render_leads_view(frame, app, area))
    }

    fn with_leads(n: i64) -> App {
        let mut app = App::new(Theme::default());
        app.leads.leads = (1..=n)
            .map(|i| {
                let mut l = lead(i, &format!("Lead {i}"), 1);
                l.stage_name = "New".into();
                l
            })
            .collect();
        app.leads.loaded = true;
        app
    }

    #[test]
    fn rows_show_name_type_and_stage() {
        let app = with_leads(2);
        let out = render(&app, 10);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " Leads");
        assert_eq!(lines[4], " \u{25B8} Lead 1  BUYER \u{2022} New");
        assert_eq!(lines[5], "   Lead 2  BUYER \u{2022} New");
    }

    #[test]
    fn search_box_shows_placeholder_then_text() {
        let mut app = with_leads(1);
        let out = render(&app, 6);
        assert!(out.lines().nth(1).unwrap().contains("Search leads"));

        app.leads.focus = LeadsFocus::Search;
        app.leads.search.set_value("roe");
        let out = render(&app, 6);
        assert_eq!(out.lines().nth(1), Some(" / roe\u{258C}"));
    }

    #[test]
    fn cursor_row_stays_visible() {
        let mut app = with_leads(20);
        app.leads.index = 15;
        let out = render(&app, 8);
        assert!(out.contains("\u{25B8} Lead 16"));
        assert!(!out.contains("Lead 1 "));
    }

    #[test]
    fn query_match_is_highlighted() {
        let mut app = with_leads(1);
        app.leads.query = "lead".into();
        let backend = ratatui::backend::TestBackend::new(TERM_W, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_leads_view(frame, &app, frame.area()))
            .unwrap();
        let buf = terminal.backend().buffer();
        // "Lead" starts after the cursor marker on the first row
        assert_eq!(buf[(3, 4)].symbol(), "L");
        assert_eq!(buf[(3, 4)].bg, app.theme.search_match_bg);
        assert_eq!(buf[(8, 4)].bg, app.theme.selection_bg);
    }

    #[test]
    fn loading_and_empty_states() {
        let app = App::new(Theme::default());
        assert!(render(&app, 6).ends_with("Loading leads\u{2026}"));

        let mut app = with_leads(0);
        assert!(render(&app, 6).ends_with("No leads yet."));
        app.leads.query = "zzz".into();
        assert!(render(&app, 6).ends_with("No leads match \"zzz\"."));
    }
}
