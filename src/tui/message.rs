use crossterm::event::Event;
use indexmap::IndexMap;

use crate::model::{Lead, Note, Stage, StageId, Task};

use super::app::ReturnView;

/// One lead with its tasks and notes, fetched together
#[derive(Debug, Clone)]
pub struct LeadDetail {
    pub lead: Lead,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
}

/// Everything the transition function consumes: terminal input and the
/// result of each finished command.
#[derive(Debug)]
pub enum Message {
    Input(Event),
    BoardLoaded {
        stages: Vec<Stage>,
        by_stage: IndexMap<StageId, Vec<Lead>>,
    },
    LeadsLoaded(Vec<Lead>),
    OpenTasksLoaded(Vec<Task>),
    /// `open` is set when the load was a request to show the detail screen,
    /// and names the screen to return to.
    DetailLoaded {
        detail: LeadDetail,
        open: Option<ReturnView>,
    },
    /// A mutation succeeded
    Status(String),
    /// A command failed; `what` is the command label
    Failed { what: &'static str, reason: String },
}
