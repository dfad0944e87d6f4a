//! Repository for the `runs` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::run::{NewRun, Run, RunFilter};

/// Column list, qualified with the `r` alias used by every query.
const COLUMNS: &str = "r.id, r.session_id, r.driver_id, r.vehicle_id, r.status, r.started_at, \
                       r.finished_at, r.total_time_ms, r.penalty_ms, r.final_time_ms, \
                       r.start_number_used, r.start_number_source, r.comment, \
                       r.created_at, r.updated_at";

/// Session and driver joins needed for the default ordering.
const JOINS: &str = "JOIN sessions se ON se.id = r.session_id \
                     JOIN stages s ON s.id = se.stage_id \
                     JOIN events e ON e.id = s.event_id \
                     JOIN drivers d ON d.id = r.driver_id";

/// Default ordering: session order, then driver order.
const ORDER_BY: &str = "e.start_date DESC, e.name, e.id, s.stage_order, s.id, \
                        se.start_time, se.name, se.id, d.last_name, d.first_name, d.id, r.id";

/// Provides create and read operations for runs.
pub struct RunRepo;

impl RunRepo {
    /// Insert a new run, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewRun) -> Result<Run, sqlx::Error> {
        let query = format!(
            "INSERT INTO runs AS r (session_id, driver_id, vehicle_id, status, started_at,
                                    finished_at, total_time_ms, penalty_ms, final_time_ms,
                                    start_number_used, start_number_source, comment)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Run>(&query)
            .bind(input.session_id)
            .bind(input.driver_id)
            .bind(input.vehicle_id)
            .bind(&input.status)
            .bind(input.started_at)
            .bind(input.finished_at)
            .bind(input.total_time_ms)
            .bind(input.penalty_ms)
            .bind(input.final_time_ms)
            .bind(input.start_number_used)
            .bind(&input.start_number_source)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Find a run by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Run>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM runs r WHERE r.id = $1");
        sqlx::query_as::<_, Run>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List runs in default order, optionally narrowed to a session and/or driver.
    pub async fn list(pool: &PgPool, filter: &RunFilter) -> Result<Vec<Run>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM runs r {JOINS}
             WHERE ($1::BIGINT IS NULL OR r.session_id = $1)
               AND ($2::BIGINT IS NULL OR r.driver_id = $2)
             ORDER BY {ORDER_BY}"
        );
        sqlx::query_as::<_, Run>(&query)
            .bind(filter.session_id)
            .bind(filter.driver_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every column of a run.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &NewRun) -> Result<Option<Run>, sqlx::Error> {
        let query = format!(
            "UPDATE runs AS r SET
                session_id = $2,
                driver_id = $3,
                vehicle_id = $4,
                status = $5,
                started_at = $6,
                finished_at = $7,
                total_time_ms = $8,
                penalty_ms = $9,
                final_time_ms = $10,
                start_number_used = $11,
                start_number_source = $12,
                comment = $13
             WHERE r.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Run>(&query)
            .bind(id)
            .bind(input.session_id)
            .bind(input.driver_id)
            .bind(input.vehicle_id)
            .bind(&input.status)
            .bind(input.started_at)
            .bind(input.finished_at)
            .bind(input.total_time_ms)
            .bind(input.penalty_ms)
            .bind(input.final_time_ms)
            .bind(input.start_number_used)
            .bind(&input.start_number_source)
            .bind(&input.comment)
            .fetch_optional(pool)
            .await
    }

    /// Delete a run. Its passages keep their rows with the run cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "runs", id).await
    }
}
