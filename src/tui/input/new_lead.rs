use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, NewLeadField, View};
use crate::tui::command::Command;

use super::common::edit_text;
use super::{ValidationError, report};

pub(super) fn handle_new_lead(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let Some(form) = app.new_lead.as_mut() else {
        app.view = View::Board;
        return Vec::new();
    };

    match key.code {
        KeyCode::Esc => {
            app.new_lead = None;
            app.view = View::Board;
        }
        KeyCode::BackTab => {
            if let Some(prev) = form.field.prev() {
                form.field = prev;
            }
        }
        KeyCode::Tab => {
            if let Some(next) = form.field.next() {
                form.field = next;
            }
        }
        KeyCode::Enter => match form.field.next() {
            Some(next) => form.field = next,
            None => {
                let result = submit(app);
                return report(app, result);
            }
        },
        _ => {
            edit_text(form.focused_mut(), key);
        }
    }
    Vec::new()
}

fn submit(app: &mut App) -> Result<Vec<Command>, ValidationError> {
    let Some(form) = app.new_lead.as_mut() else {
        return Ok(Vec::new());
    };
    let lead = form.to_new_lead();
    if lead.full_name.is_empty() {
        form.field = NewLeadField::Name;
        return Err(ValidationError::NameRequired);
    }
    let stage_id = form
        .stage_id
        .or_else(|| app.pipeline.stages.first().map(|s| s.id))
        .ok_or(ValidationError::NoStages)?;

    app.new_lead = None;
    app.view = View::Board;
    Ok(vec![Command::CreateLead { lead, stage_id }, Command::LoadBoard])
}
