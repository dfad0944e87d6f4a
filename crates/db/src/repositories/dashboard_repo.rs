//! Dashboard counts.

use sqlx::PgPool;

use crate::models::dashboard::DashboardCounts;

/// Read-only aggregate queries for the dashboard.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Count the master-data rows shown on the dashboard in one round trip.
    pub async fn counts(pool: &PgPool) -> Result<DashboardCounts, sqlx::Error> {
        sqlx::query_as::<_, DashboardCounts>(
            "SELECT
                (SELECT COUNT(*) FROM events)   AS events,
                (SELECT COUNT(*) FROM stages)   AS stages,
                (SELECT COUNT(*) FROM sessions) AS sessions,
                (SELECT COUNT(*) FROM drivers)  AS drivers,
                (SELECT COUNT(*) FROM vehicles) AS vehicles,
                (SELECT COUNT(*) FROM gates)    AS gates",
        )
        .fetch_one(pool)
        .await
    }
}
