use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ReturnView, View};
use crate::tui::command::Command;

use super::common::{step, vertical};

pub(super) fn handle_tasks(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let tasks = &mut app.tasks;
    if let Some(down) = vertical(key) {
        tasks.index = step(tasks.index, tasks.tasks.len(), down);
        return Vec::new();
    }
    match key.code {
        KeyCode::Esc => {
            app.view = View::Board;
            vec![Command::LoadBoard]
        }
        KeyCode::Enter => match tasks.selected() {
            Some(task) => vec![Command::LoadLeadDetail {
                lead_id: task.lead_id,
                open: Some(ReturnView::TaskList),
            }],
            None => Vec::new(),
        },
        KeyCode::Char('c') => match tasks.selected() {
            Some(task) => vec![
                Command::CompleteTask { task_id: task.id },
                Command::LoadOpenTasks,
            ],
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}
