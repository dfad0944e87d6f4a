//! Camera capture entity model and DTOs.

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `captures` table. Captures are append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Capture {
    pub id: DbId,
    pub passage_id: DbId,
    pub image_path: String,
    pub captured_at_ms: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub sha256: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating or fully replacing a capture.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCapture {
    pub passage_id: DbId,
    pub image_path: String,
    pub captured_at_ms: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub sha256: Option<String>,
}
