use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LeadId, StageId};

/// Classification tag given to leads created without one
pub const DEFAULT_LEAD_TYPE: &str = "buyer";

/// A column of the pipeline board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    /// Display position; ties are broken by id
    pub sort: i64,
    /// Optional `#RRGGBB` tint for the column title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Sort stages into board order: by sort key, then id.
pub fn sort_stages(stages: &mut [Stage]) {
    stages.sort_by_key(|s| (s.sort, s.id));
}

/// A tracked prospect, attached to exactly one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// Lowercase classification tag (`buyer`, `seller`, ...)
    pub lead_type: String,
    pub source: String,
    pub stage_id: StageId,
    /// Name of `stage_id`, joined in for list displays
    pub stage_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_contacted: Option<DateTime<Utc>>,
}

impl Lead {
    /// Case-insensitive substring match over name, phone, email and source.
    /// An empty (or all-whitespace) query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        [&self.full_name, &self.phone, &self.email, &self.source]
            .iter()
            .any(|field| field.to_lowercase().contains(&q))
    }
}

/// Field values for a lead that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub lead_type: String,
    pub source: String,
}

impl NewLead {
    /// Trim every field, lowercase the type and default it when blank.
    pub fn normalized(self) -> Self {
        let lead_type = self.lead_type.trim().to_lowercase();
        NewLead {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            lead_type: if lead_type.is_empty() {
                DEFAULT_LEAD_TYPE.to_string()
            } else {
                lead_type
            },
            source: self.source.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(name: &str, phone: &str, email: &str, source: &str) -> Lead {
        let now = Utc::now();
        Lead {
            id: LeadId(1),
            full_name: name.into(),
            phone: phone.into(),
            email: email.into(),
            lead_type: "buyer".into(),
            source: source.into(),
            stage_id: StageId(1),
            stage_name: "New".into(),
            created_at: now,
            updated_at: now,
            last_contacted: None,
        }
    }

    #[test]
    fn query_matches_any_field_case_insensitively() {
        let l = lead("Jane Roe", "555-0100", "jane@example.com", "Zillow");
        assert!(l.matches_query("jane"));
        assert!(l.matches_query("0100"));
        assert!(l.matches_query("EXAMPLE"));
        assert!(l.matches_query("zill"));
        assert!(l.matches_query("   "));
        assert!(!l.matches_query("referral"));
    }

    #[test]
    fn stages_sort_by_key_then_id() {
        let mk = |id, sort| Stage {
            id: StageId(id),
            name: format!("s{id}"),
            sort,
            color: None,
        };
        let mut stages = vec![mk(3, 2), mk(2, 1), mk(1, 2)];
        sort_stages(&mut stages);
        let ids: Vec<i64> = stages.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn normalized_defaults_type_and_trims() {
        let n = NewLead {
            full_name: "  Jane Roe ".into(),
            lead_type: "  ".into(),
            source: " Referral".into(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(n.full_name, "Jane Roe");
        assert_eq!(n.lead_type, "buyer");
        assert_eq!(n.source, "Referral");

        let n = NewLead {
            lead_type: "Seller".into(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(n.lead_type, "seller");
    }
}
