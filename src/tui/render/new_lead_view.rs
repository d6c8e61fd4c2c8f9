use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, NewLeadField};

use super::helpers::{field_spans, hint_line, render_placeholder, title_line};

/// Render the new-lead form: one labelled row per field
pub fn render_new_lead_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.new_lead else {
        render_placeholder(frame, app, area, "No form open.");
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;

    let stage_name = form
        .stage_id
        .and_then(|id| app.pipeline.stages.iter().find(|s| s.id == id))
        .or_else(|| app.pipeline.stages.first())
        .map_or("\u{2014}", |s| s.name.as_str());

    let mut lines = vec![
        title_line(theme, "New Lead"),
        Line::from(vec![
            Span::styled(" Stage: ", Style::default().fg(theme.dim).bg(bg)),
            Span::styled(stage_name.to_string(), Style::default().fg(theme.text).bg(bg)),
        ]),
        Line::default(),
    ];

    for field in NewLeadField::ALL {
        let focused = field == form.field;
        let label_style = if focused {
            Style::default()
                .fg(theme.header)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };
        let marker = if focused { " \u{25B8} " } else { "   " };
        let mut spans = vec![Span::styled(
            format!("{marker}{:<8}", field.label()),
            label_style,
        )];
        spans.extend(field_spans(form.field(field), focused, theme));
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(hint_line(
        theme,
        "enter: next/save \u{2022} shift+tab: back \u{2022} esc: cancel",
    ));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StageId;
    use crate::tui::app::{NewLeadForm, View};
    use crate::tui::fixtures::app_with_board;
    use crate::tui::render::test_helpers::{TERM_W, render_to_string};
    use pretty_assertions::assert_eq;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 12, |frame, area| render_new_lead_view(frame, app, area))
    }

    #[test]
    fn form_rows_with_focus_marker() {
        let mut app = app_with_board(&[("New", &[]), ("Contacted", &[])]);
        app.view = View::NewLead;
        let mut form = NewLeadForm::new(Some(StageId(2)));
        form.name.set_value("Jane Roe");
        form.field = NewLeadField::Phone;
        app.new_lead = Some(form);

        let out = render(&app);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " New Lead");
        assert_eq!(lines[1], " Stage: Contacted");
        assert_eq!(lines[3], "   Name    Jane Roe");
        assert_eq!(lines[4], " \u{25B8} Phone   \u{258C}Phone");
        assert_eq!(lines[6], "   Type    buyer");
        assert_eq!(lines[7], "   Source  Source: Zillow, referral, sign call\u{2026}");
    }

    #[test]
    fn unknown_stage_falls_back_to_first() {
        let mut app = app_with_board(&[("New", &[])]);
        app.new_lead = Some(NewLeadForm::new(None));
        let out = render(&app);
        assert_eq!(out.lines().nth(1), Some(" Stage: New"));
    }
}
