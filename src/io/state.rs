use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::StageId;

const STATE_FILE: &str = "state.json";

/// Persisted TUI state (written to state.json beside the database)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Which view was showing ("board", "leads", "tasks")
    pub view: String,
    /// Last applied lead search
    #[serde(default)]
    pub last_search: Option<String>,
    /// Stage column the board cursor was on
    #[serde(default)]
    pub stage_id: Option<StageId>,
}

/// Location of the state file for a given database file
pub fn state_path(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(STATE_FILE),
        _ => PathBuf::from(STATE_FILE),
    }
}

/// Read the state file; missing or malformed files give `None`.
pub fn read_ui_state(path: &Path) -> Option<UiState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the state file atomically (temp file in the same directory, then rename).
pub fn write_ui_state(path: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let content = serde_json::to_string_pretty(state)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
