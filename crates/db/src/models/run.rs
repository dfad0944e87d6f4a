//! Run entity model and DTOs.

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{default_run_status, default_start_number_source};

/// A row from the `runs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Run {
    pub id: DbId,
    pub session_id: DbId,
    pub driver_id: DbId,
    pub vehicle_id: Option<DbId>,
    pub status: String,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub total_time_ms: Option<i64>,
    pub penalty_ms: i32,
    pub final_time_ms: Option<i64>,
    pub start_number_used: Option<i32>,
    pub start_number_source: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or fully replacing a run.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRun {
    pub session_id: DbId,
    pub driver_id: DbId,
    pub vehicle_id: Option<DbId>,
    #[serde(default = "default_run_status")]
    pub status: String,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub total_time_ms: Option<i64>,
    #[serde(default)]
    pub penalty_ms: i32,
    pub final_time_ms: Option<i64>,
    pub start_number_used: Option<i32>,
    #[serde(default = "default_start_number_source")]
    pub start_number_source: String,
    pub comment: Option<String>,
}

/// Optional exact-match filters for listing runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunFilter {
    pub session_id: Option<DbId>,
    pub driver_id: Option<DbId>,
}
