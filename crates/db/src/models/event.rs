//! Event entity model and DTOs.

use std::fmt;

use rallycontrol_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Timezone assigned to events created without one.
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub name: String,
    pub location: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub timezone: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.start_date.format("%Y-%m-%d"))
    }
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// DTO for creating or fully replacing an event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub location: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub notes: Option<String>,
}
