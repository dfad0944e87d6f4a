//! Repository for the `drivers` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::driver::{Driver, DriverListItem, NewDriver};

/// Column list, qualified with the `d` alias used by every query.
const COLUMNS: &str = "d.id, d.first_name, d.last_name, d.display_name, d.team, \
                       d.race_class_id, d.default_start_number, d.transponder_id, \
                       d.is_active, d.notes, d.created_at, d.updated_at";

/// Default ordering: last name, then first name.
const ORDER_BY: &str = "d.last_name, d.first_name, d.id";

/// Provides CRUD operations for drivers.
pub struct DriverRepo;

impl DriverRepo {
    /// Insert a new driver, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewDriver) -> Result<Driver, sqlx::Error> {
        let query = format!(
            "INSERT INTO drivers AS d (first_name, last_name, display_name, team, race_class_id,
                                       default_start_number, transponder_id, is_active, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.display_name)
            .bind(&input.team)
            .bind(input.race_class_id)
            .bind(input.default_start_number)
            .bind(&input.transponder_id)
            .bind(input.is_active)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a driver by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers d WHERE d.id = $1");
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all drivers in default order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers d ORDER BY {ORDER_BY}");
        sqlx::query_as::<_, Driver>(&query).fetch_all(pool).await
    }

    /// List all drivers in default order with their class name.
    pub async fn list_with_labels(pool: &PgPool) -> Result<Vec<DriverListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, rc.name AS race_class_name
             FROM drivers d
             LEFT JOIN classes rc ON rc.id = d.race_class_id
             ORDER BY {ORDER_BY}"
        );
        sqlx::query_as::<_, DriverListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find one driver with its class name.
    pub async fn find_with_labels(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DriverListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, rc.name AS race_class_name
             FROM drivers d
             LEFT JOIN classes rc ON rc.id = d.race_class_id
             WHERE d.id = $1"
        );
        sqlx::query_as::<_, DriverListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// `(id, label)` pairs for select widgets, in default order.
    pub async fn choices(pool: &PgPool) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        let query = format!(
            "SELECT d.id,
                    COALESCE(NULLIF(d.display_name, ''), d.first_name || ' ' || d.last_name)
             FROM drivers d
             ORDER BY {ORDER_BY}"
        );
        sqlx::query_as(&query).fetch_all(pool).await
    }

    /// Replace every editable column of a driver.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewDriver,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!(
            "UPDATE drivers AS d SET
                first_name = $2,
                last_name = $3,
                display_name = $4,
                team = $5,
                race_class_id = $6,
                default_start_number = $7,
                transponder_id = $8,
                is_active = $9,
                notes = $10
             WHERE d.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.display_name)
            .bind(&input.team)
            .bind(input.race_class_id)
            .bind(input.default_start_number)
            .bind(&input.transponder_id)
            .bind(input.is_active)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a driver together with its vehicles and runs.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "drivers", id).await
    }
}
