use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{LeadId, parse_due_date};
use crate::tui::app::{
    AddNoteForm, AddTaskForm, App, DetailFocus, LeadDetailState, ReturnView, TaskField, View,
};
use crate::tui::command::Command;

use super::common::{edit_text, step, vertical};
use super::{ValidationError, report};

pub(super) fn handle_detail(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let Some(detail) = app.detail.as_mut() else {
        app.view = View::Board;
        return vec![Command::LoadBoard];
    };

    let result = match detail.focus {
        // Esc from the task list leaves the screen
        DetailFocus::Tasks if key.code == KeyCode::Esc => {
            let back = detail.return_to;
            app.view = back.view();
            return vec![match back {
                ReturnView::Board => Command::LoadBoard,
                ReturnView::LeadList => Command::LoadLeads {
                    query: app.leads.query.clone(),
                },
                ReturnView::TaskList => Command::LoadOpenTasks,
            }];
        }
        DetailFocus::Tasks => Ok(handle_tasks_focus(detail, key)),
        DetailFocus::Note(_) => handle_note_form(detail, key),
        DetailFocus::Task(_) => handle_task_form(detail, key),
    };

    report(app, result)
}

fn handle_tasks_focus(detail: &mut LeadDetailState, key: KeyEvent) -> Vec<Command> {
    if let Some(down) = vertical(key) {
        detail.task_index = step(detail.task_index, detail.tasks.len(), down);
        return Vec::new();
    }
    match key.code {
        KeyCode::Char('a') => detail.focus = DetailFocus::Note(AddNoteForm::default()),
        KeyCode::Char('f') => detail.focus = DetailFocus::Task(AddTaskForm::default()),
        KeyCode::Char('c') => {
            if let Some(task) = detail.selected_task() {
                let lead_id = detail.lead.id;
                return vec![
                    Command::CompleteTask { task_id: task.id },
                    Command::LoadLeadDetail {
                        lead_id,
                        open: None,
                    },
                    Command::LoadOpenTasks,
                ];
            }
        }
        _ => {}
    }
    Vec::new()
}

fn handle_note_form(
    detail: &mut LeadDetailState,
    key: KeyEvent,
) -> Result<Vec<Command>, ValidationError> {
    let DetailFocus::Note(form) = &mut detail.focus else {
        return Ok(Vec::new());
    };
    match key.code {
        KeyCode::Esc => detail.focus = DetailFocus::Tasks,
        KeyCode::Enter => {
            let body = form.body.trimmed().to_string();
            if body.is_empty() {
                return Err(ValidationError::NoteRequired);
            }
            let lead_id = detail.lead.id;
            detail.focus = DetailFocus::Tasks;
            return Ok(refresh_after_write(
                Command::AddNote { lead_id, body },
                lead_id,
            ));
        }
        _ => {
            edit_text(&mut form.body, key);
        }
    }
    Ok(Vec::new())
}

fn handle_task_form(
    detail: &mut LeadDetailState,
    key: KeyEvent,
) -> Result<Vec<Command>, ValidationError> {
    let DetailFocus::Task(form) = &mut detail.focus else {
        return Ok(Vec::new());
    };
    match (key.code, form.field) {
        (KeyCode::Esc, _) => detail.focus = DetailFocus::Tasks,
        (KeyCode::Enter | KeyCode::Tab, TaskField::Title) => form.field = TaskField::Due,
        (KeyCode::BackTab, TaskField::Due) => form.field = TaskField::Title,
        (KeyCode::Enter, TaskField::Due) => {
            let title = form.title.trimmed().to_string();
            if title.is_empty() {
                form.field = TaskField::Title;
                return Err(ValidationError::TitleRequired);
            }
            let due = parse_due_date(&form.due.value)
                .map_err(|_| ValidationError::InvalidDueDate(form.due.trimmed().to_string()))?;
            let lead_id = detail.lead.id;
            detail.focus = DetailFocus::Tasks;
            return Ok(refresh_after_write(
                Command::CreateTask {
                    lead_id,
                    title,
                    due,
                },
                lead_id,
            ));
        }
        _ => {
            edit_text(form.focused_mut(), key);
        }
    }
    Ok(Vec::new())
}

/// A write to a lead plus every projection it can make stale.
fn refresh_after_write(write: Command, lead_id: LeadId) -> Vec<Command> {
    vec![
        write,
        Command::LoadLeadDetail {
            lead_id,
            open: None,
        },
        Command::LoadBoard,
        Command::LoadOpenTasks,
    ]
}
