use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, NewLeadForm, PendingSelection, ReturnView, View};
use crate::tui::command::Command;

use super::common::{step, vertical};

pub(super) fn handle_board(app: &mut App, key: KeyEvent) -> Vec<Command> {
    let p = &mut app.pipeline;

    if let Some(down) = vertical(key) {
        p.lead_index = step(p.lead_index, p.current_leads().len(), down);
        return Vec::new();
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            p.stage_index = p.stage_index.saturating_sub(1);
            p.clamp();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            p.stage_index += 1;
            p.clamp();
        }
        KeyCode::Enter => {
            if let Some(lead) = p.selected_lead() {
                return vec![Command::LoadLeadDetail {
                    lead_id: lead.id,
                    open: Some(ReturnView::Board),
                }];
            }
        }
        KeyCode::Char('n') => {
            let stage_id = p.current_stage().map(|s| s.id);
            app.new_lead = Some(NewLeadForm::new(stage_id));
            app.view = View::NewLead;
        }
        KeyCode::Char('H') => return move_selected(app, -1),
        KeyCode::Char('L') => return move_selected(app, 1),
        _ => {}
    }
    Vec::new()
}

/// Move the selected lead one stage left or right. The cursor follows
/// when the board reload arrives.
fn move_selected(app: &mut App, delta: isize) -> Vec<Command> {
    let p = &mut app.pipeline;
    let Some(lead_id) = p.selected_lead().map(|l| l.id) else {
        return Vec::new();
    };
    let Some(target) = p
        .stage_index
        .checked_add_signed(delta)
        .and_then(|i| p.stages.get(i))
    else {
        return Vec::new();
    };
    let stage_id = target.id;
    p.pending = Some(PendingSelection { lead_id, stage_id });
    vec![Command::MoveLead { lead_id, stage_id }, Command::LoadBoard]
}
