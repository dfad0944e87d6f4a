//! Cached leaderboard entity model and DTOs.
//!
//! `data_json` is an opaque payload produced by the ranking service; it is
//! stored and returned verbatim.

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leaderboards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Leaderboard {
    pub id: DbId,
    pub session_id: DbId,
    pub race_class_id: Option<DbId>,
    pub generated_at: Timestamp,
    pub data_json: serde_json::Value,
    pub checksum: Option<String>,
}

/// DTO for creating or fully replacing a leaderboard.
///
/// `generated_at` defaults to the insert time when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaderboard {
    pub session_id: DbId,
    pub race_class_id: Option<DbId>,
    pub generated_at: Option<Timestamp>,
    pub data_json: serde_json::Value,
    pub checksum: Option<String>,
}
