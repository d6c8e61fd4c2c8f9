//! The transition function: the only code that mutates [`App`].
//!
//! Each message is applied to completion before the next one is taken from
//! the queue. Whatever storage work a transition needs comes back as
//! [`Command`]s for the dispatcher.

use crossterm::event::{Event, KeyEventKind};
use indexmap::IndexMap;

use crate::model::{Lead, Stage, StageId, sort_stages};

use super::app::{
    App, DetailFocus, LeadDetailState, Notice, PipelineState, ReturnView, View, clamp_index,
};
use super::command::Command;
use super::input;
use super::message::{LeadDetail, Message};

pub fn update(app: &mut App, msg: Message) -> Vec<Command> {
    match msg {
        Message::Input(Event::Key(key)) => {
            if key.kind != KeyEventKind::Press {
                return Vec::new();
            }
            input::handle_key(app, key)
        }
        // Resize and the rest only need a redraw
        Message::Input(_) => Vec::new(),
        Message::BoardLoaded { stages, by_stage } => {
            apply_board(&mut app.pipeline, stages, by_stage);
            Vec::new()
        }
        Message::LeadsLoaded(leads) => {
            app.leads.index = clamp_index(app.leads.index, leads.len());
            app.leads.leads = leads;
            app.leads.loaded = true;
            Vec::new()
        }
        Message::OpenTasksLoaded(tasks) => {
            app.tasks.index = clamp_index(app.tasks.index, tasks.len());
            app.tasks.tasks = tasks;
            app.tasks.loaded = true;
            Vec::new()
        }
        Message::DetailLoaded { detail, open } => {
            apply_detail(app, detail, open);
            Vec::new()
        }
        Message::Status(text) => {
            app.notice = Some(Notice::Status(text));
            Vec::new()
        }
        Message::Failed { what, reason } => {
            app.notice = Some(Notice::Error(format!("{what}: {reason}")));
            Vec::new()
        }
    }
}

/// Replace the board projection, re-target the cursor, then clamp.
fn apply_board(
    pipeline: &mut PipelineState,
    mut stages: Vec<Stage>,
    by_stage: IndexMap<StageId, Vec<Lead>>,
) {
    sort_stages(&mut stages);
    pipeline.stages = stages;
    pipeline.by_stage = by_stage;
    pipeline.loaded = true;
    tracing::debug!(
        stages = pipeline.stages.len(),
        leads = pipeline.by_stage.values().map(Vec::len).sum::<usize>(),
        "board reloaded"
    );

    if let Some(stage_id) = pipeline.restore_stage.take()
        && let Some(i) = pipeline.stages.iter().position(|s| s.id == stage_id)
    {
        pipeline.stage_index = i;
        pipeline.lead_index = 0;
    }

    if let Some(pending) = pipeline.pending.take() {
        if let Some(i) = pipeline.stages.iter().position(|s| s.id == pending.stage_id) {
            pipeline.stage_index = i;
        }
        let found = pipeline
            .leads_in(pending.stage_id)
            .iter()
            .position(|l| l.id == pending.lead_id);
        if let Some(j) = found {
            pipeline.lead_index = j;
        }
        tracing::debug!(
            lead = %pending.lead_id,
            stage = %pending.stage_id,
            found = found.is_some(),
            "pending selection consumed"
        );
    }

    pipeline.clamp();
}

/// An open request shows the detail screen, unless the user has left the
/// screen it came from or is typing. A refresh only replaces the snapshot
/// of the lead already on screen, keeping focus and any open form.
fn apply_detail(app: &mut App, detail: LeadDetail, open: Option<ReturnView>) {
    let LeadDetail { lead, tasks, notes } = detail;
    match open {
        Some(return_to) => {
            if app.view != return_to.view() || app.is_typing() {
                tracing::debug!(lead = %lead.id, view = ?app.view, "stale detail open dropped");
                return;
            }
            app.detail = Some(LeadDetailState {
                lead,
                tasks,
                notes,
                task_index: 0,
                focus: DetailFocus::Tasks,
                return_to,
            });
            app.view = View::LeadDetail;
        }
        None => {
            if let Some(current) = app.detail.as_mut()
                && current.lead.id == lead.id
            {
                current.task_index = clamp_index(current.task_index, tasks.len());
                current.lead = lead;
                current.tasks = tasks;
                current.notes = notes;
            }
        }
    }
}
