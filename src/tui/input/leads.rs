use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, LeadsFocus, ReturnView, View};
use crate::tui::command::Command;

use super::common::{edit_text, step, vertical};

pub(super) fn handle_leads(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let leads = &mut app.leads;
    match leads.focus {
        LeadsFocus::Search => match key.code {
            KeyCode::Enter => {
                leads.query = leads.search.trimmed().to_string();
                leads.focus = LeadsFocus::List;
                leads.index = 0;
                vec![Command::LoadLeads {
                    query: leads.query.clone(),
                }]
            }
            KeyCode::Esc => {
                leads.focus = LeadsFocus::List;
                Vec::new()
            }
            _ => {
                edit_text(&mut leads.search, key);
                Vec::new()
            }
        },
        LeadsFocus::List => {
            if let Some(down) = vertical(key) {
                leads.index = step(leads.index, leads.leads.len(), down);
                return Vec::new();
            }
            match key.code {
                KeyCode::Char('/') => {
                    leads.focus = LeadsFocus::Search;
                    leads.search.end();
                    Vec::new()
                }
                KeyCode::Enter => match leads.selected() {
                    Some(lead) => vec![Command::LoadLeadDetail {
                        lead_id: lead.id,
                        open: Some(ReturnView::LeadList),
                    }],
                    None => Vec::new(),
                },
                KeyCode::Esc => {
                    app.view = View::Board;
                    vec![Command::LoadBoard]
                }
                _ => Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LeadId;
    use crate::tui::fixtures::lead;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::theme::Theme;
    use pretty_assertions::assert_eq;

    fn on_list() -> App {
        let mut app = App::new(Theme::default());
        app.view = View::LeadList;
        app.leads.leads = vec![lead(1, "Jane Roe", 1), lead(2, "Bob Stone", 1)];
        app.leads.loaded = true;
        app
    }

    #[test]
    fn search_applies_on_enter_only() {
        let mut app = on_list();
        handle_key(&mut app, ch('/'));
        assert!(app.is_typing());
        for c in " 0102 ".chars() {
            assert!(handle_key(&mut app, ch(c)).is_empty());
        }
        assert_eq!(app.leads.query, "");

        let cmds = handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            cmds,
            vec![Command::LoadLeads {
                query: "0102".into()
            }]
        );
        assert_eq!(app.leads.query, "0102");
        assert_eq!(app.leads.focus, LeadsFocus::List);
    }

    #[test]
    fn empty_search_lists_everything() {
        let mut app = on_list();
        handle_key(&mut app, ch('/'));
        let cmds = handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(cmds, vec![Command::LoadLeads { query: String::new() }]);
    }

    #[test]
    fn esc_in_search_only_blurs() {
        let mut app = on_list();
        handle_key(&mut app, ch('/'));
        handle_key(&mut app, ch('x'));
        assert!(handle_key(&mut app, key(KeyCode::Esc)).is_empty());
        assert_eq!(app.view, View::LeadList);
        assert_eq!(app.leads.focus, LeadsFocus::List);
        assert_eq!(app.leads.search.value, "x");
    }

    #[test]
    fn esc_while_navigating_returns_to_board() {
        let mut app = on_list();
        let cmds = handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.view, View::Board);
        assert_eq!(cmds, vec![Command::LoadBoard]);
    }

    #[test]
    fn enter_opens_selected_lead() {
        let mut app = on_list();
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        let cmds = handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            cmds,
            vec![Command::LoadLeadDetail {
                lead_id: LeadId(2),
                open: Some(ReturnView::LeadList),
            }]
        );
    }

    #[test]
    fn j_types_into_search_when_focused() {
        let mut app = on_list();
        app.leads.focus = LeadsFocus::Search;
        handle_key(&mut app, ch('j'));
        assert_eq!(app.leads.index, 0);
        assert_eq!(app.leads.search.value, "j");
    }
}
