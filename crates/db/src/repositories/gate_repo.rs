//! Repository for the `gates` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::gate::{Gate, GateListItem, NewGate};

/// Column list, qualified with the `g` alias used by every query.
const COLUMNS: &str = "g.id, g.gate_uid, g.name, g.gate_type, g.stage_id, g.ip_address, \
                       g.location_hint, g.is_enabled, g.last_seen_at, g.fw_version, \
                       g.notes, g.created_at, g.updated_at";

/// Optional stage and event joins for labels.
const JOINS: &str =
    "LEFT JOIN stages s ON s.id = g.stage_id LEFT JOIN events e ON e.id = s.event_id";

/// Provides CRUD operations for timing gates.
pub struct GateRepo;

impl GateRepo {
    /// Insert a new gate, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewGate) -> Result<Gate, sqlx::Error> {
        let query = format!(
            "INSERT INTO gates AS g (gate_uid, name, gate_type, stage_id, ip_address,
                                     location_hint, is_enabled, last_seen_at, fw_version, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gate>(&query)
            .bind(&input.gate_uid)
            .bind(&input.name)
            .bind(&input.gate_type)
            .bind(input.stage_id)
            .bind(&input.ip_address)
            .bind(&input.location_hint)
            .bind(input.is_enabled)
            .bind(input.last_seen_at)
            .bind(&input.fw_version)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a gate by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Gate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gates g WHERE g.id = $1");
        sqlx::query_as::<_, Gate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a gate by its hardware UID.
    pub async fn find_by_uid(pool: &PgPool, gate_uid: &str) -> Result<Option<Gate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gates g WHERE g.gate_uid = $1");
        sqlx::query_as::<_, Gate>(&query)
            .bind(gate_uid)
            .fetch_optional(pool)
            .await
    }

    /// List all gates ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Gate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gates g ORDER BY g.name, g.id");
        sqlx::query_as::<_, Gate>(&query).fetch_all(pool).await
    }

    /// List all gates ordered by name with stage and event names.
    pub async fn list_with_labels(pool: &PgPool) -> Result<Vec<GateListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, s.name AS stage_name, e.name AS event_name
             FROM gates g {JOINS}
             ORDER BY g.name, g.id"
        );
        sqlx::query_as::<_, GateListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find one gate with stage and event names.
    pub async fn find_with_labels(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GateListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, s.name AS stage_name, e.name AS event_name
             FROM gates g {JOINS}
             WHERE g.id = $1"
        );
        sqlx::query_as::<_, GateListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace every editable column of a gate.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewGate,
    ) -> Result<Option<Gate>, sqlx::Error> {
        let query = format!(
            "UPDATE gates AS g SET
                gate_uid = $2,
                name = $3,
                gate_type = $4,
                stage_id = $5,
                ip_address = $6,
                location_hint = $7,
                is_enabled = $8,
                last_seen_at = $9,
                fw_version = $10,
                notes = $11
             WHERE g.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gate>(&query)
            .bind(id)
            .bind(&input.gate_uid)
            .bind(&input.name)
            .bind(&input.gate_type)
            .bind(input.stage_id)
            .bind(&input.ip_address)
            .bind(&input.location_hint)
            .bind(input.is_enabled)
            .bind(input.last_seen_at)
            .bind(&input.fw_version)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a gate and its passages.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "gates", id).await
    }
}
