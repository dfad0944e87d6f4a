//! Vehicle entity model and DTOs.

use std::fmt;

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::default_true;

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub driver_id: DbId,
    pub race_class_id: Option<DbId>,
    pub name: String,
    pub default_start_number: Option<i32>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A vehicle joined with its driver's label and class name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VehicleListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub driver_label: String,
    pub race_class_name: Option<String>,
}

impl fmt::Display for VehicleListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.driver_label, self.vehicle.name)
    }
}

/// DTO for creating or fully replacing a vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVehicle {
    pub driver_id: DbId,
    pub race_class_id: Option<DbId>,
    pub name: String,
    pub default_start_number: Option<i32>,
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
