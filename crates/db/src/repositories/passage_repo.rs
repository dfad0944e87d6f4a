//! Repository for the `passages` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::passage::{NewPassage, Passage, PassageFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, run_id, session_id, gate_id, timestamp_ms, received_at, direction, \
                       signal_quality, raw_payload, is_valid, created_at, updated_at";

/// Provides create and read operations for gate passages.
pub struct PassageRepo;

impl PassageRepo {
    /// Insert a new passage, returning the created row.
    ///
    /// `received_at` defaults to now when not given.
    pub async fn create(pool: &PgPool, input: &NewPassage) -> Result<Passage, sqlx::Error> {
        let query = format!(
            "INSERT INTO passages (run_id, session_id, gate_id, timestamp_ms, received_at,
                                   direction, signal_quality, raw_payload, is_valid)
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Passage>(&query)
            .bind(input.run_id)
            .bind(input.session_id)
            .bind(input.gate_id)
            .bind(input.timestamp_ms)
            .bind(input.received_at)
            .bind(&input.direction)
            .bind(&input.signal_quality)
            .bind(&input.raw_payload)
            .bind(input.is_valid)
            .fetch_one(pool)
            .await
    }

    /// Find a passage by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Passage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM passages WHERE id = $1");
        sqlx::query_as::<_, Passage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List passages by gate timestamp, optionally narrowed by session, gate or run.
    pub async fn list(pool: &PgPool, filter: &PassageFilter) -> Result<Vec<Passage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM passages
             WHERE ($1::BIGINT IS NULL OR session_id = $1)
               AND ($2::BIGINT IS NULL OR gate_id = $2)
               AND ($3::BIGINT IS NULL OR run_id = $3)
             ORDER BY timestamp_ms, id"
        );
        sqlx::query_as::<_, Passage>(&query)
            .bind(filter.session_id)
            .bind(filter.gate_id)
            .bind(filter.run_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every column of a passage.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewPassage,
    ) -> Result<Option<Passage>, sqlx::Error> {
        let query = format!(
            "UPDATE passages SET
                run_id = $2,
                session_id = $3,
                gate_id = $4,
                timestamp_ms = $5,
                received_at = COALESCE($6, received_at),
                direction = $7,
                signal_quality = $8,
                raw_payload = $9,
                is_valid = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Passage>(&query)
            .bind(id)
            .bind(input.run_id)
            .bind(input.session_id)
            .bind(input.gate_id)
            .bind(input.timestamp_ms)
            .bind(input.received_at)
            .bind(&input.direction)
            .bind(&input.signal_quality)
            .bind(&input.raw_payload)
            .bind(input.is_valid)
            .fetch_optional(pool)
            .await
    }

    /// Delete a passage and its captures.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "passages", id).await
    }
}
