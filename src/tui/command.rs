use chrono::NaiveDate;

use crate::io::store::{Result, Store};
use crate::model::{LeadId, NewLead, StageId, TaskId};

use super::app::ReturnView;
use super::message::{LeadDetail, Message};

/// A storage request. Pure data until a worker executes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadBoard,
    LoadLeads {
        query: String,
    },
    LoadOpenTasks,
    LoadLeadDetail {
        lead_id: LeadId,
        open: Option<ReturnView>,
    },
    CreateLead {
        lead: NewLead,
        stage_id: StageId,
    },
    MoveLead {
        lead_id: LeadId,
        stage_id: StageId,
    },
    AddNote {
        lead_id: LeadId,
        body: String,
    },
    CreateTask {
        lead_id: LeadId,
        title: String,
        due: Option<NaiveDate>,
    },
    CompleteTask {
        task_id: TaskId,
    },
}

impl Command {
    /// Short name used in logs and failure notices
    pub fn label(&self) -> &'static str {
        match self {
            Command::LoadBoard => "load board",
            Command::LoadLeads { .. } => "load leads",
            Command::LoadOpenTasks => "load tasks",
            Command::LoadLeadDetail { .. } => "load lead",
            Command::CreateLead { .. } => "create lead",
            Command::MoveLead { .. } => "move lead",
            Command::AddNote { .. } => "add note",
            Command::CreateTask { .. } => "create follow-up",
            Command::CompleteTask { .. } => "complete task",
        }
    }

    /// Run against the store, blocking, and describe the outcome.
    pub fn execute(self, store: &dyn Store) -> Message {
        let what = self.label();
        self.run(store).unwrap_or_else(|e| Message::Failed {
            what,
            reason: e.to_string(),
        })
    }

    fn run(self, store: &dyn Store) -> Result<Message> {
        Ok(match self {
            Command::LoadBoard => Message::BoardLoaded {
                stages: store.list_stages()?,
                by_stage: store.list_leads_by_stage()?,
            },
            Command::LoadLeads { query } => Message::LeadsLoaded(store.list_leads(&query)?),
            Command::LoadOpenTasks => Message::OpenTasksLoaded(store.list_open_tasks()?),
            Command::LoadLeadDetail { lead_id, open } => Message::DetailLoaded {
                detail: LeadDetail {
                    lead: store.get_lead(lead_id)?,
                    tasks: store.list_tasks_for_lead(lead_id)?,
                    notes: store.list_notes(lead_id)?,
                },
                open,
            },
            Command::CreateLead { lead, stage_id } => {
                store.create_lead(&lead, stage_id)?;
                Message::Status("Lead created.".into())
            }
            Command::MoveLead { lead_id, stage_id } => {
                store.move_lead_stage(lead_id, stage_id)?;
                Message::Status("Moved lead.".into())
            }
            Command::AddNote { lead_id, body } => {
                store.add_note(lead_id, &body)?;
                Message::Status("Note added.".into())
            }
            Command::CreateTask {
                lead_id,
                title,
                due,
            } => {
                store.create_task(lead_id, &title, due)?;
                Message::Status("Follow-up created.".into())
            }
            Command::CompleteTask { task_id } => {
                store.complete_task(task_id)?;
                Message::Status("Task completed.".into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SqliteStore;

    fn store_with_lead() -> (SqliteStore, LeadId) {
        let store = SqliteStore::open_in_memory().unwrap();
        let stage = store.list_stages().unwrap()[0].id;
        let lead = NewLead {
            full_name: "Jane Roe".into(),
            lead_type: "buyer".into(),
            ..Default::default()
        };
        let id = store.create_lead(&lead, stage).unwrap();
        (store, id)
    }

    #[test]
    fn load_board_yields_stages_and_leads() {
        let (store, id) = store_with_lead();
        match Command::LoadBoard.execute(&store) {
            Message::BoardLoaded { stages, by_stage } => {
                assert_eq!(stages.len(), 5);
                assert_eq!(by_stage[&stages[0].id][0].id, id);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn detail_load_carries_open_target() {
        let (store, id) = store_with_lead();
        store.add_note(id, "hello").unwrap();
        let cmd = Command::LoadLeadDetail {
            lead_id: id,
            open: Some(ReturnView::TaskList),
        };
        match cmd.execute(&store) {
            Message::DetailLoaded { detail, open } => {
                assert_eq!(detail.lead.full_name, "Jane Roe");
                assert_eq!(detail.notes.len(), 1);
                assert!(detail.tasks.is_empty());
                assert_eq!(open, Some(ReturnView::TaskList));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn mutations_report_status_text() {
        let (store, id) = store_with_lead();
        let stages = store.list_stages().unwrap();
        let cases = vec![
            (
                Command::MoveLead {
                    lead_id: id,
                    stage_id: stages[1].id,
                },
                "Moved lead.",
            ),
            (
                Command::AddNote {
                    lead_id: id,
                    body: "Called".into(),
                },
                "Note added.",
            ),
            (
                Command::CreateTask {
                    lead_id: id,
                    title: "Call back".into(),
                    due: None,
                },
                "Follow-up created.",
            ),
            (
                Command::CompleteTask { task_id: TaskId(1) },
                "Task completed.",
            ),
        ];
        for (cmd, expected) in cases {
            match cmd.execute(&store) {
                Message::Status(text) => assert_eq!(text, expected),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn failures_name_the_command() {
        let (store, _) = store_with_lead();
        let msg = Command::LoadLeadDetail {
            lead_id: LeadId(42),
            open: Some(ReturnView::Board),
        }
        .execute(&store);
        match msg {
            Message::Failed { what, reason } => {
                assert_eq!(what, "load lead");
                assert_eq!(reason, "lead 42 not found");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
