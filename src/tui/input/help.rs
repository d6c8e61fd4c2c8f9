use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;
use crate::tui::command::Command;

pub(super) fn handle_help(app: &mut App, key: KeyEvent) -> Vec<Command> {
    if key.code == KeyCode::Esc {
        app.view = app.help_return;
    }
    Vec::new()
}
