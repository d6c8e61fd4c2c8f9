use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::model::{
    DUE_DATE_FORMAT, Lead, LeadId, NewLead, Note, NoteId, Stage, StageId, Task, TaskId,
    TaskStatus, sort_tasks,
};

use super::migrate::run_migrations;
use super::store::{Result, Store, StoreError};

const LEAD_SELECT: &str = "
SELECT l.id, l.full_name, l.phone, l.email, l.lead_type, l.source,
       l.stage_id, s.name, l.created_at, l.updated_at, l.last_contacted
FROM leads l
JOIN stages s ON s.id = l.stage_id";

const TASK_SELECT: &str = "
SELECT t.id, t.lead_id, l.full_name, t.title, t.due_date, t.status,
       t.created_at, t.completed_at
FROM tasks t
JOIN leads l ON l.id = t.lead_id";

/// [`Store`] backed by a single SQLite connection.
///
/// The connection sits behind a mutex, so concurrent commands are applied
/// one at a time.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and migrate it.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// A private, migrated in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        run_migrations(&mut conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_leads(&self, sql: &str) -> Result<Vec<Lead>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([], LeadRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(LeadRow::into_lead).collect()
    }

    fn query_tasks(&self, sql: &str, lead_id: Option<LeadId>) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match lead_id {
            Some(id) => stmt.query_map([id.0], TaskRow::from_row)?,
            None => stmt.query_map([], TaskRow::from_row)?,
        }
        .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut tasks = rows
            .into_iter()
            .map(TaskRow::into_task)
            .collect::<Result<Vec<_>>>()?;
        sort_tasks(&mut tasks);
        Ok(tasks)
    }
}

impl Store for SqliteStore {
    fn list_stages(&self) -> Result<Vec<Stage>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, sort, color FROM stages ORDER BY sort, id")?;
        let stages = stmt
            .query_map([], |row| {
                Ok(Stage {
                    id: StageId(row.get(0)?),
                    name: row.get(1)?,
                    sort: row.get(2)?,
                    color: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stages)
    }

    fn list_leads_by_stage(&self) -> Result<IndexMap<StageId, Vec<Lead>>> {
        let sql = format!(
            "{LEAD_SELECT}\nORDER BY s.sort ASC, s.id ASC, l.updated_at DESC, l.id DESC"
        );
        let mut by_stage: IndexMap<StageId, Vec<Lead>> = IndexMap::new();
        for lead in self.query_leads(&sql)? {
            by_stage.entry(lead.stage_id).or_default().push(lead);
        }
        Ok(by_stage)
    }

    fn list_leads(&self, query: &str) -> Result<Vec<Lead>> {
        let sql = format!("{LEAD_SELECT}\nORDER BY l.updated_at DESC, l.id DESC");
        let mut leads = self.query_leads(&sql)?;
        leads.retain(|l| l.matches_query(query));
        Ok(leads)
    }

    fn get_lead(&self, id: LeadId) -> Result<Lead> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("{LEAD_SELECT}\nWHERE l.id = ?1"),
                [id.0],
                LeadRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => row.into_lead(),
            None => Err(StoreError::NotFound {
                entity: "lead",
                id: id.0,
            }),
        }
    }

    fn create_lead(&self, lead: &NewLead, stage_id: StageId) -> Result<LeadId> {
        let conn = self.conn()?;
        let now = now_text();
        conn.execute(
            "INSERT INTO leads(full_name, phone, email, lead_type, source, stage_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                lead.full_name,
                lead.phone,
                lead.email,
                lead.lead_type,
                lead.source,
                stage_id.0,
                now,
            ],
        )?;
        Ok(LeadId(conn.last_insert_rowid()))
    }

    fn move_lead_stage(&self, lead_id: LeadId, stage_id: StageId) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE leads SET stage_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![stage_id.0, now_text(), lead_id.0],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "lead",
                id: lead_id.0,
            });
        }
        Ok(())
    }

    fn list_notes(&self, lead_id: LeadId) -> Result<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, lead_id, body, created_at FROM notes
             WHERE lead_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([lead_id.0], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(id, lead_id, body, created)| {
                Ok(Note {
                    id: NoteId(id),
                    lead_id: LeadId(lead_id),
                    body,
                    created_at: parse_timestamp("notes.created_at", &created)?,
                })
            })
            .collect()
    }

    fn add_note(&self, lead_id: LeadId, body: &str) -> Result<NoteId> {
        let mut conn = self.conn()?;
        let now = now_text();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO notes(lead_id, body, created_at) VALUES (?1, ?2, ?3)",
            params![lead_id.0, body, now],
        )?;
        let id = NoteId(tx.last_insert_rowid());
        tx.execute(
            "UPDATE leads SET updated_at = ?1 WHERE id = ?2",
            params![now, lead_id.0],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn list_tasks_for_lead(&self, lead_id: LeadId) -> Result<Vec<Task>> {
        self.query_tasks(&format!("{TASK_SELECT}\nWHERE t.lead_id = ?1"), Some(lead_id))
    }

    fn list_open_tasks(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!("{TASK_SELECT}\nWHERE t.status = 'open'"), None)
    }

    fn create_task(
        &self,
        lead_id: LeadId,
        title: &str,
        due: Option<NaiveDate>,
    ) -> Result<TaskId> {
        let mut conn = self.conn()?;
        let now = now_text();
        let due = due.map(|d| d.format(DUE_DATE_FORMAT).to_string());
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks(lead_id, title, due_date, status, created_at)
             VALUES (?1, ?2, ?3, 'open', ?4)",
            params![lead_id.0, title, due, now],
        )?;
        let id = TaskId(tx.last_insert_rowid());
        tx.execute(
            "UPDATE leads SET updated_at = ?1 WHERE id = ?2",
            params![now, lead_id.0],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn complete_task(&self, task_id: TaskId) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE tasks
             SET status = 'done', completed_at = COALESCE(completed_at, ?1)
             WHERE id = ?2",
            params![now_text(), task_id.0],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "task",
                id: task_id.0,
            });
        }
        Ok(())
    }
}

struct LeadRow {
    id: i64,
    full_name: String,
    phone: String,
    email: String,
    lead_type: String,
    source: String,
    stage_id: i64,
    stage_name: String,
    created_at: String,
    updated_at: String,
    last_contacted: Option<String>,
}

impl LeadRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(LeadRow {
            id: row.get(0)?,
            full_name: row.get(1)?,
            phone: row.get(2)?,
            email: row.get(3)?,
            lead_type: row.get(4)?,
            source: row.get(5)?,
            stage_id: row.get(6)?,
            stage_name: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
            last_contacted: row.get(10)?,
        })
    }

    fn into_lead(self) -> Result<Lead> {
        Ok(Lead {
            id: LeadId(self.id),
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            lead_type: self.lead_type,
            source: self.source,
            stage_id: StageId(self.stage_id),
            stage_name: self.stage_name,
            created_at: parse_timestamp("leads.created_at", &self.created_at)?,
            updated_at: parse_timestamp("leads.updated_at", &self.updated_at)?,
            last_contacted: self
                .last_contacted
                .filter(|s| !s.is_empty())
                .map(|s| parse_timestamp("leads.last_contacted", &s))
                .transpose()?,
        })
    }
}

struct TaskRow {
    id: i64,
    lead_id: i64,
    lead_name: String,
    title: String,
    due_date: Option<String>,
    status: String,
    created_at: String,
    completed_at: Option<String>,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TaskRow {
            id: row.get(0)?,
            lead_id: row.get(1)?,
            lead_name: row.get(2)?,
            title: row.get(3)?,
            due_date: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
            completed_at: row.get(7)?,
        })
    }

    fn into_task(self) -> Result<Task> {
        let due_date = match self.due_date.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(NaiveDate::parse_from_str(s, DUE_DATE_FORMAT).map_err(|_| {
                StoreError::Corrupt {
                    column: "tasks.due_date",
                    value: s.to_string(),
                }
            })?),
            None => None,
        };
        let status: TaskStatus = self.status.parse().map_err(|_| StoreError::Corrupt {
            column: "tasks.status",
            value: self.status.clone(),
        })?;
        Ok(Task {
            id: TaskId(self.id),
            lead_id: LeadId(self.lead_id),
            lead_name: self.lead_name,
            title: self.title,
            due_date,
            status,
            created_at: parse_timestamp("tasks.created_at", &self.created_at)?,
            completed_at: self
                .completed_at
                .map(|s| parse_timestamp("tasks.completed_at", &s))
                .transpose()?,
        })
    }
}

/// Current time in the stored text form: RFC 3339, UTC, microseconds.
/// Fixed width, so text order matches time order.
fn now_text() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339 and SQLite's `datetime('now')` form.
fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|t| t.and_utc())
        .map_err(|_| StoreError::Corrupt {
            column,
            value: value.to_string(),
        })
}
