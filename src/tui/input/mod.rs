mod board;
mod common;
mod detail;
mod help;
mod leads;
mod new_lead;
mod tasks;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, LeadsFocus, Notice, View};
use super::command::Command;

use board::handle_board;
use common::normalize_key;
use detail::handle_detail;
use help::handle_help;
use leads::handle_leads;
use new_lead::handle_new_lead;
use tasks::handle_tasks;

/// Problems caught at submit time, before any command is issued
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("note is required")]
    NoteRequired,
    #[error("title is required")]
    TitleRequired,
    #[error("invalid due date {0:?} (expected YYYY-MM-DD)")]
    InvalidDueDate(String),
    #[error("no stages to add a lead to")]
    NoStages,
}

/// Handle a key press: global shortcuts first (unless a field holds
/// focus), then the active screen.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Command> {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return Vec::new();
    }
    let key = normalize_key(key);

    if !app.is_typing()
        && let Some(commands) = handle_global(app, key)
    {
        return commands;
    }

    match app.view {
        View::Board => handle_board(app, key),
        View::LeadList => handle_leads(app, key),
        View::LeadDetail => handle_detail(app, key),
        View::NewLead => handle_new_lead(app, key),
        View::TaskList => handle_tasks(app, key),
        View::Help => handle_help(app, key),
    }
}

/// Shortcuts available on every screen while navigating. `None` means the
/// key is not global and belongs to the screen.
fn handle_global(app: &mut App, key: KeyEvent) -> Option<Vec<Command>> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
            Some(Vec::new())
        }
        (_, KeyCode::Char('?')) => {
            if app.view == View::Help {
                app.view = app.help_return;
            } else {
                app.help_return = app.view;
                app.view = View::Help;
            }
            Some(Vec::new())
        }
        (_, KeyCode::Tab) => match app.view {
            View::Board => Some(enter_lead_list(app)),
            View::LeadList => Some(leave_lead_list(app)),
            _ => None,
        },
        (_, KeyCode::Char('t')) => {
            app.view = View::TaskList;
            Some(vec![Command::LoadOpenTasks])
        }
        _ => None,
    }
}

/// Switch to the lead list with the search box focused and refresh it.
fn enter_lead_list(app: &mut App) -> Vec<Command> {
    app.view = View::LeadList;
    app.leads.focus = LeadsFocus::Search;
    app.leads.query = app.leads.search.trimmed().to_string();
    vec![Command::LoadLeads {
        query: app.leads.query.clone(),
    }]
}

fn leave_lead_list(app: &mut App) -> Vec<Command> {
    app.leads.focus = LeadsFocus::List;
    app.view = View::Board;
    vec![Command::LoadBoard]
}

/// Put a failed validation into the notice slot.
fn report(app: &mut App, result: Result<Vec<Command>, ValidationError>) -> Vec<Command> {
    result.unwrap_or_else(|e| {
        app.notice = Some(Notice::Error(e.to_string()));
        Vec::new()
    })
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    pub fn shift(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;
    use crate::tui::app::{DetailFocus, NewLeadForm, ReturnView};
    use crate::tui::fixtures::{lead, open_detail};
    use crate::tui::theme::Theme;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(Theme::default())
    }

    #[test]
    fn q_and_ctrl_c_quit_while_navigating() {
        let mut a = app();
        handle_key(&mut a, ch('q'));
        assert!(a.should_quit);

        let mut a = app();
        handle_key(&mut a, ctrl('c'));
        assert!(a.should_quit);
    }

    #[test]
    fn globals_are_routed_to_the_field_while_typing() {
        let mut a = app();
        a.view = View::NewLead;
        a.new_lead = Some(NewLeadForm::new(None));
        for c in ['q', 't', '?'] {
            assert!(handle_key(&mut a, ch(c)).is_empty());
        }
        handle_key(&mut a, ctrl('c'));
        assert!(!a.should_quit);
        assert_eq!(a.view, View::NewLead);
        assert_eq!(a.new_lead.as_ref().unwrap().name.value, "qt?");
    }

    #[test]
    fn help_toggles_back_to_previous_screen() {
        let mut a = app();
        a.view = View::TaskList;
        handle_key(&mut a, ch('?'));
        assert_eq!(a.view, View::Help);
        handle_key(&mut a, ch('?'));
        assert_eq!(a.view, View::TaskList);
    }

    #[test]
    fn tab_switches_board_and_lead_list() {
        let mut a = app();
        a.leads.search.set_value("  roe ");
        let cmds = handle_key(&mut a, key(KeyCode::Tab));
        assert_eq!(a.view, View::LeadList);
        assert_eq!(a.leads.focus, LeadsFocus::Search);
        assert_eq!(
            cmds,
            vec![Command::LoadLeads {
                query: "roe".into()
            }]
        );

        // Typing in the search box: Tab is not global
        assert!(handle_key(&mut a, key(KeyCode::Tab)).is_empty());
        assert_eq!(a.view, View::LeadList);

        handle_key(&mut a, key(KeyCode::Esc));
        let cmds = handle_key(&mut a, key(KeyCode::Tab));
        assert_eq!(a.view, View::Board);
        assert_eq!(cmds, vec![Command::LoadBoard]);
    }

    #[test]
    fn t_opens_task_list_and_loads() {
        let mut a = app();
        let cmds = handle_key(&mut a, ch('t'));
        assert_eq!(a.view, View::TaskList);
        assert_eq!(cmds, vec![Command::LoadOpenTasks]);
    }

    #[test]
    fn tab_does_nothing_on_other_screens() {
        let mut a = app();
        a.view = View::TaskList;
        assert!(handle_key(&mut a, key(KeyCode::Tab)).is_empty());
        assert_eq!(a.view, View::TaskList);
    }

    #[test]
    fn detail_form_blocks_globals() {
        let mut a = app();
        open_detail(&mut a, lead(1, "A", 1), Vec::new(), ReturnView::Board);
        a.detail.as_mut().unwrap().focus = DetailFocus::Note(Default::default());
        handle_key(&mut a, ch('q'));
        assert!(!a.should_quit);
        match &a.detail.as_ref().unwrap().focus {
            DetailFocus::Note(form) => assert_eq!(form.body.value, "q"),
            other => panic!("unexpected focus {other:?}"),
        }
    }
}
