//! Gate passage entity model and DTOs.

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::default_true;

/// A row from the `passages` table.
///
/// `timestamp_ms` is the gate's own clock; `received_at` is when the
/// server stored the passage.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Passage {
    pub id: DbId,
    pub run_id: Option<DbId>,
    pub session_id: DbId,
    pub gate_id: DbId,
    pub timestamp_ms: i64,
    pub received_at: Timestamp,
    pub direction: Option<String>,
    pub signal_quality: Option<String>,
    pub raw_payload: Option<String>,
    pub is_valid: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or fully replacing a passage.
///
/// `received_at` defaults to the insert time when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPassage {
    pub run_id: Option<DbId>,
    pub session_id: DbId,
    pub gate_id: DbId,
    pub timestamp_ms: i64,
    pub received_at: Option<Timestamp>,
    pub direction: Option<String>,
    pub signal_quality: Option<String>,
    pub raw_payload: Option<String>,
    #[serde(default = "default_true")]
    pub is_valid: bool,
}

/// Optional exact-match filters for listing passages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassageFilter {
    pub session_id: Option<DbId>,
    pub gate_id: Option<DbId>,
    pub run_id: Option<DbId>,
}
