use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LeadId, NoteId};

/// An append-only note attached to a lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub lead_id: LeadId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
