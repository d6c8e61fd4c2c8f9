//! Builders shared by the TUI unit tests.

use chrono::{NaiveDate, TimeZone, Utc};
use indexmap::IndexMap;

use crate::model::{Lead, LeadId, Note, NoteId, Stage, StageId, Task, TaskId, TaskStatus};

use super::app::{App, DetailFocus, LeadDetailState, ReturnView, View};
use super::theme::Theme;

pub fn stage(id: i64, name: &str) -> Stage {
    Stage {
        id: StageId(id),
        name: name.into(),
        sort: id * 10,
        color: None,
    }
}

pub fn lead(id: i64, name: &str, stage_id: i64) -> Lead {
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap();
    Lead {
        id: LeadId(id),
        full_name: name.into(),
        phone: format!("555-01{id:02}"),
        email: String::new(),
        lead_type: "buyer".into(),
        source: String::new(),
        stage_id: StageId(stage_id),
        stage_name: String::new(),
        created_at: at,
        updated_at: at,
        last_contacted: None,
    }
}

pub fn task(id: i64, lead_id: i64, title: &str, due: Option<(i32, u32, u32)>) -> Task {
    Task {
        id: TaskId(id),
        lead_id: LeadId(lead_id),
        lead_name: String::new(),
        title: title.into(),
        due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        status: TaskStatus::Open,
        created_at: Utc::now(),
        completed_at: None,
    }
}

pub fn note(id: i64, lead_id: i64, body: &str) -> Note {
    Note {
        id: NoteId(id),
        lead_id: LeadId(lead_id),
        body: body.into(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 3, 14, 5, 0).unwrap(),
    }
}

/// An app with a loaded board: stage names with the leads in each
pub fn app_with_board(columns: &[(&str, &[(i64, &str)])]) -> App {
    let mut app = App::new(Theme::default());
    let mut by_stage = IndexMap::new();
    for (i, (name, leads)) in columns.iter().enumerate() {
        let stage = stage(i as i64 + 1, name);
        if !leads.is_empty() {
            by_stage.insert(
                stage.id,
                leads
                    .iter()
                    .map(|(id, n)| {
                        let mut l = lead(*id, n, stage.id.0);
                        l.stage_name = stage.name.clone();
                        l
                    })
                    .collect(),
            );
        }
        app.pipeline.stages.push(stage);
    }
    app.pipeline.by_stage = by_stage;
    app.pipeline.loaded = true;
    app
}

/// Put `app` on the detail screen for a lead with the given tasks
pub fn open_detail(app: &mut App, lead: Lead, tasks: Vec<Task>, return_to: ReturnView) {
    app.detail = Some(LeadDetailState {
        lead,
        tasks,
        notes: Vec::new(),
        task_index: 0,
        focus: DetailFocus::Tasks,
        return_to,
    });
    app.view = View::LeadDetail;
}
