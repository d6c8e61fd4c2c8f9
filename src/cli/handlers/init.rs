use std::path::Path;

use serde::Serialize;

use crate::io::{SqliteStore, Store};

#[derive(Serialize)]
struct InitJson {
    database: String,
    stages: usize,
}

/// Create the database if needed and bring its schema up to date. Safe to
/// run against an existing database.
pub fn cmd_init(db_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let existed = db_path.exists();
    let store = SqliteStore::open(db_path)
        .map_err(|e| format!("cannot initialize {}: {}", db_path.display(), e))?;
    let stages = store.list_stages()?.len();
    tracing::info!(db = %db_path.display(), existed, "database ready");

    if json {
        let out = InitJson {
            database: db_path.display().to_string(),
            stages,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if existed {
        println!("Database up to date: {}", db_path.display());
    } else {
        println!("Created {} with {} stages", db_path.display(), stages);
    }
    Ok(())
}
