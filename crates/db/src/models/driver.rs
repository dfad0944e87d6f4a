//! Driver entity model and DTOs.

use std::fmt;

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::default_true;

/// A row from the `drivers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Driver {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub team: Option<String>,
    pub race_class_id: Option<DbId>,
    pub default_start_number: Option<i32>,
    pub transponder_id: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Driver {
    /// Display name, or "first last" when none is set.
    pub fn label(&self) -> String {
        driver_label(self.display_name.as_deref(), &self.first_name, &self.last_name)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Shared by [`Driver`] and the joined labels of vehicles and runs.
pub fn driver_label(display_name: Option<&str>, first_name: &str, last_name: &str) -> String {
    match display_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{first_name} {last_name}"),
    }
}

/// A driver joined with the name of its race class.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DriverListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub driver: Driver,
    pub race_class_name: Option<String>,
}

impl fmt::Display for DriverListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.driver.fmt(f)
    }
}

/// DTO for creating or fully replacing a driver.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDriver {
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub team: Option<String>,
    pub race_class_id: Option<DbId>,
    pub default_start_number: Option<i32>,
    pub transponder_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub notes: Option<String>,
}
