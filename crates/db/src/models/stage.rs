//! Stage entity model and DTOs.

use std::fmt;

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{default_stage_mode, default_true};

/// A row from the `stages` table.
///
/// `distance_m` is `NUMERIC(8,2)` in storage and read as `FLOAT8`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stage {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub stage_order: i32,
    pub mode: String,
    pub distance_m: Option<f64>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stage joined with the name of its event.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StageListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub stage: Stage,
    pub event_name: String,
}

impl fmt::Display for StageListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.event_name, self.stage.name)
    }
}

/// DTO for creating or fully replacing a stage.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStage {
    pub event_id: DbId,
    pub name: String,
    #[serde(default = "default_stage_order")]
    pub stage_order: i32,
    #[serde(default = "default_stage_mode")]
    pub mode: String,
    pub distance_m: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Order given to stages created without one.
pub const DEFAULT_STAGE_ORDER: i32 = 1;

fn default_stage_order() -> i32 {
    DEFAULT_STAGE_ORDER
}
