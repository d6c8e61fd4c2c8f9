use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Lead, Stage, Task, TaskStatus};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct StageJson<'a> {
    #[serde(flatten)]
    pub stage: &'a Stage,
    pub leads: usize,
}

#[derive(Serialize)]
pub struct IdJson {
    pub id: i64,
}

#[derive(Serialize)]
pub struct MovedJson<'a> {
    pub lead_id: i64,
    pub stage_id: i64,
    pub stage: &'a str,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `   1  New (3)`
pub fn format_stage_line(stage: &Stage, leads: usize) -> String {
    format!("{:>4}  {} ({})", stage.id, stage.name, leads)
}

/// Id, name and type, then whichever of stage, phone, email and source are set
pub fn format_lead_line(lead: &Lead) -> String {
    let details: Vec<&str> = [
        lead.stage_name.as_str(),
        lead.phone.as_str(),
        lead.email.as_str(),
        lead.source.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    let mut line = format!("{:>4}  {} [{}]", lead.id, lead.full_name, lead.lead_type);
    if !details.is_empty() {
        line.push_str("  ");
        line.push_str(&details.join(" \u{2022} "));
    }
    line
}

/// `   7  [ ] Call back  due 2025-01-01  (Jane Roe)`, flagging overdue dates
pub fn format_task_line(task: &Task, today: NaiveDate) -> String {
    let check = if task.status == TaskStatus::Done { 'x' } else { ' ' };
    let due = match task.due_label() {
        Some(d) if task.is_open() && task.due_date.is_some_and(|due| due < today) => {
            format!("due {d} (overdue)")
        }
        Some(d) => format!("due {d}"),
        None => "no due date".to_string(),
    };
    let mut line = format!("{:>4}  [{}] {}  {}", task.id, check, task.title, due);
    if !task.lead_name.is_empty() {
        line.push_str(&format!("  ({})", task.lead_name));
    }
    line
}
