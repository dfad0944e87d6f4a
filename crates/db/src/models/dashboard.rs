//! Dashboard entity counts.

use serde::Serialize;
use sqlx::FromRow;

/// Live row counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct DashboardCounts {
    pub events: i64,
    pub stages: i64,
    pub sessions: i64,
    pub drivers: i64,
    pub vehicles: i64,
    pub gates: i64,
}
