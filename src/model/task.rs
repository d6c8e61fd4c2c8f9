use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LeadId, TaskId};

/// Calendar format used for due dates everywhere (`YYYY-MM-DD`)
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Follow-up task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TaskStatus::Open),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// A follow-up task attached to a lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub lead_id: LeadId,
    /// Owning lead's name, filled in by cross-lead listings (empty otherwise)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lead_name: String,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    /// Present iff `status` is `Done`
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }

    /// Due date as `YYYY-MM-DD`, if any
    pub fn due_label(&self) -> Option<String> {
        self.due_date
            .map(|d| d.format(DUE_DATE_FORMAT).to_string())
    }

    /// Open and due on or before `today`
    pub fn is_due_by(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date.is_some_and(|d| d <= today)
    }
}

/// Display order for task lists: open before done, then due date ascending
/// with undated tasks last, then newest id first.
pub fn task_display_order(a: &Task, b: &Task) -> Ordering {
    let status_rank = |t: &Task| match t.status {
        TaskStatus::Open => 0,
        TaskStatus::Done => 1,
    };
    status_rank(a)
        .cmp(&status_rank(b))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.id.cmp(&a.id))
}

pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(task_display_order);
}

/// Parse an optional due date: blank means none.
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DUE_DATE_FORMAT).map(Some)
}
