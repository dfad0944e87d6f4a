//! Session entity model and DTOs.

use std::fmt;

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{default_session_status, default_session_type};

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub stage_id: DbId,
    pub name: String,
    pub session_type: String,
    pub status: String,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A session joined with its stage and event names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub session: Session,
    pub stage_name: String,
    pub event_name: String,
}

impl SessionListItem {
    /// Label of the owning stage, "event - stage".
    pub fn stage_label(&self) -> String {
        format!("{} - {}", self.event_name, self.stage_name)
    }
}

impl fmt::Display for SessionListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.stage_label(), self.session.name)
    }
}

/// DTO for creating or fully replacing a session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    pub stage_id: DbId,
    pub name: String,
    #[serde(default = "default_session_type")]
    pub session_type: String,
    #[serde(default = "default_session_status")]
    pub status: String,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}
