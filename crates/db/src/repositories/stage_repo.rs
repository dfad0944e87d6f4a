//! Repository for the `stages` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::stage::{NewStage, Stage, StageListItem};

/// Column list, qualified with the `s` alias used by every query.
/// `distance_m` is cast from `NUMERIC(8,2)` so it decodes as `f64`.
const COLUMNS: &str = "s.id, s.event_id, s.name, s.stage_order, s.mode, \
                       s.distance_m::FLOAT8 AS distance_m, s.is_active, \
                       s.created_at, s.updated_at";

/// Default ordering: event order (latest start first), then stage order.
const ORDER_BY: &str = "e.start_date DESC, e.name, e.id, s.stage_order, s.id";

/// Provides CRUD operations for stages.
pub struct StageRepo;

impl StageRepo {
    /// Insert a new stage, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewStage) -> Result<Stage, sqlx::Error> {
        let query = format!(
            "INSERT INTO stages AS s (event_id, name, stage_order, mode, distance_m, is_active)
             VALUES ($1, $2, $3, $4, $5::NUMERIC(8,2), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stage>(&query)
            .bind(input.event_id)
            .bind(&input.name)
            .bind(input.stage_order)
            .bind(&input.mode)
            .bind(input.distance_m)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a stage by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Stage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stages s WHERE s.id = $1");
        sqlx::query_as::<_, Stage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all stages in default order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Stage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stages s
             JOIN events e ON e.id = s.event_id
             ORDER BY {ORDER_BY}"
        );
        sqlx::query_as::<_, Stage>(&query).fetch_all(pool).await
    }

    /// List the stages of one event by stage order.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Stage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stages s
             WHERE s.event_id = $1
             ORDER BY s.stage_order, s.id"
        );
        sqlx::query_as::<_, Stage>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// List all stages in default order with their event name.
    pub async fn list_with_labels(pool: &PgPool) -> Result<Vec<StageListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, e.name AS event_name
             FROM stages s
             JOIN events e ON e.id = s.event_id
             ORDER BY {ORDER_BY}"
        );
        sqlx::query_as::<_, StageListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find one stage with its event name.
    pub async fn find_with_labels(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StageListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, e.name AS event_name
             FROM stages s
             JOIN events e ON e.id = s.event_id
             WHERE s.id = $1"
        );
        sqlx::query_as::<_, StageListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// `(id, "event - stage")` pairs for select widgets, in default order.
    pub async fn choices(pool: &PgPool) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        let query = format!(
            "SELECT s.id, e.name || ' - ' || s.name
             FROM stages s
             JOIN events e ON e.id = s.event_id
             ORDER BY {ORDER_BY}"
        );
        sqlx::query_as(&query).fetch_all(pool).await
    }

    /// Replace every editable column of a stage.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewStage,
    ) -> Result<Option<Stage>, sqlx::Error> {
        let query = format!(
            "UPDATE stages AS s SET
                event_id = $2,
                name = $3,
                stage_order = $4,
                mode = $5,
                distance_m = $6::NUMERIC(8,2),
                is_active = $7
             WHERE s.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stage>(&query)
            .bind(id)
            .bind(input.event_id)
            .bind(&input.name)
            .bind(input.stage_order)
            .bind(&input.mode)
            .bind(input.distance_m)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a stage and its sessions. Gates on the stage are unassigned.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "stages", id).await
    }
}
