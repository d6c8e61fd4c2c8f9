use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use super::store::Result;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_init",
        sql: r#"
CREATE TABLE stages (
  id    INTEGER PRIMARY KEY,
  name  TEXT NOT NULL UNIQUE,
  sort  INTEGER NOT NULL,
  color TEXT
);

CREATE TABLE leads (
  id             INTEGER PRIMARY KEY,
  full_name      TEXT NOT NULL,
  phone          TEXT NOT NULL DEFAULT '',
  email          TEXT NOT NULL DEFAULT '',
  lead_type      TEXT NOT NULL DEFAULT 'buyer',
  source         TEXT NOT NULL DEFAULT '',
  stage_id       INTEGER NOT NULL REFERENCES stages(id),
  created_at     TEXT NOT NULL,
  updated_at     TEXT NOT NULL,
  last_contacted TEXT
);
CREATE INDEX idx_leads_stage ON leads(stage_id, updated_at);

CREATE TABLE notes (
  id         INTEGER PRIMARY KEY,
  lead_id    INTEGER NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
  body       TEXT NOT NULL,
  created_at TEXT NOT NULL
);
CREATE INDEX idx_notes_lead ON notes(lead_id, created_at);

CREATE TABLE tasks (
  id           INTEGER PRIMARY KEY,
  lead_id      INTEGER NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
  title        TEXT NOT NULL,
  due_date     TEXT,
  status       TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'done')),
  created_at   TEXT NOT NULL,
  completed_at TEXT,
  CHECK ((status = 'done') = (completed_at IS NOT NULL))
);
CREATE INDEX idx_tasks_lead ON tasks(lead_id);
CREATE INDEX idx_tasks_status_due ON tasks(status, due_date);
"#,
    },
    Migration {
        version: "0002_default_stages",
        sql: r#"
INSERT INTO stages(name, sort) VALUES
  ('New', 10),
  ('Contacted', 20),
  ('Nurture', 30),
  ('Under Contract', 40),
  ('Closed', 50);
"#,
    },
];

/// Apply every migration not yet recorded in `schema_migrations`, each in
/// its own transaction. Returns the versions applied by this call.
pub fn run_migrations(conn: &mut Connection) -> Result<Vec<&'static str>> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
           version    TEXT PRIMARY KEY,
           applied_at TEXT NOT NULL
         );",
    )?;

    let mut applied = Vec::new();
    for migration in MIGRATIONS {
        let exists = conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                [migration.version],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations(version, applied_at) VALUES (?1, ?2)",
            params![migration.version, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        tracing::info!(version = migration.version, "applied migration");
        applied.push(migration.version);
    }
    Ok(applied)
}
