//! The storage port the board depends on.
//!
//! Every call is synchronous and may block; the TUI only ever calls these
//! from worker threads, never from the loop that owns UI state.

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::{Lead, LeadId, NewLead, Note, NoteId, Stage, StageId, Task, TaskId};

/// Errors surfaced by a [`Store`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt {column} value {value:?}")]
    Corrupt { column: &'static str, value: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Stage, lead, note and task queries and commands.
///
/// Implementations must serialize conflicting writes themselves: many
/// commands may be outstanding against one store at once.
pub trait Store: Send + Sync {
    /// All stages, ordered by sort key then id.
    fn list_stages(&self) -> Result<Vec<Stage>>;

    /// Leads grouped by stage id. Keys follow stage order; within a stage,
    /// most recently updated first, then highest id first. Stages without
    /// leads may be absent.
    fn list_leads_by_stage(&self) -> Result<IndexMap<StageId, Vec<Lead>>>;

    /// Leads matching `query` (see [`Lead::matches_query`]), most recently
    /// updated first. An empty query lists everything.
    fn list_leads(&self, query: &str) -> Result<Vec<Lead>>;

    fn get_lead(&self, id: LeadId) -> Result<Lead>;

    fn create_lead(&self, lead: &NewLead, stage_id: StageId) -> Result<LeadId>;

    /// Move a lead to another stage, refreshing its updated timestamp.
    fn move_lead_stage(&self, lead_id: LeadId, stage_id: StageId) -> Result<()>;

    /// Notes for a lead, newest first.
    fn list_notes(&self, lead_id: LeadId) -> Result<Vec<Note>>;

    /// Append a note, refreshing the lead's updated timestamp.
    fn add_note(&self, lead_id: LeadId, body: &str) -> Result<NoteId>;

    /// Tasks for a lead in display order (see [`crate::model::task_display_order`]).
    fn list_tasks_for_lead(&self, lead_id: LeadId) -> Result<Vec<Task>>;

    /// Open tasks across all leads in display order, with lead names filled in.
    fn list_open_tasks(&self) -> Result<Vec<Task>>;

    fn create_task(&self, lead_id: LeadId, title: &str, due: Option<NaiveDate>)
    -> Result<TaskId>;

    /// Mark a task done. The completion timestamp is set on the first call
    /// only; completing an already-done task leaves it unchanged.
    fn complete_task(&self, task_id: TaskId) -> Result<()>;
}
