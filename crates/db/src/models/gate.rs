//! Timing gate entity model and DTOs.

use std::fmt;

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{default_gate_type, default_true};

/// A row from the `gates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gate {
    pub id: DbId,
    pub gate_uid: String,
    pub name: String,
    pub gate_type: String,
    pub stage_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub location_hint: Option<String>,
    pub is_enabled: bool,
    pub last_seen_at: Option<Timestamp>,
    pub fw_version: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.gate_uid)
    }
}

/// A gate joined with its (optional) stage and event names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GateListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub gate: Gate,
    pub stage_name: Option<String>,
    pub event_name: Option<String>,
}

impl GateListItem {
    /// "event - stage", or empty when the gate is unassigned.
    pub fn stage_label(&self) -> String {
        match (&self.event_name, &self.stage_name) {
            (Some(event), Some(stage)) => format!("{event} - {stage}"),
            _ => String::new(),
        }
    }
}

impl fmt::Display for GateListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.gate.fmt(f)
    }
}

/// DTO for creating or fully replacing a gate.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGate {
    pub gate_uid: String,
    pub name: String,
    #[serde(default = "default_gate_type")]
    pub gate_type: String,
    pub stage_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub location_hint: Option<String>,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    pub last_seen_at: Option<Timestamp>,
    pub fw_version: Option<String>,
    pub notes: Option<String>,
}
