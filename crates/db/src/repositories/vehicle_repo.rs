//! Repository for the `vehicles` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::vehicle::{NewVehicle, Vehicle, VehicleListItem};

/// Column list, qualified with the `v` alias used by every query.
const COLUMNS: &str = "v.id, v.driver_id, v.race_class_id, v.name, v.default_start_number, \
                       v.notes, v.is_active, v.created_at, v.updated_at";

/// Joined labels for display.
const LABELS: &str = "COALESCE(NULLIF(d.display_name, ''), d.first_name || ' ' || d.last_name) \
                      AS driver_label, rc.name AS race_class_name";

const JOINS: &str =
    "JOIN drivers d ON d.id = v.driver_id LEFT JOIN classes rc ON rc.id = v.race_class_id";

/// Default ordering: driver order, then vehicle name.
const ORDER_BY: &str = "d.last_name, d.first_name, d.id, v.name, v.id";

/// Provides CRUD operations for vehicles.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Insert a new vehicle, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewVehicle) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles AS v (driver_id, race_class_id, name, default_start_number,
                                        notes, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(input.driver_id)
            .bind(input.race_class_id)
            .bind(&input.name)
            .bind(input.default_start_number)
            .bind(&input.notes)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a vehicle by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles v WHERE v.id = $1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all vehicles in default order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles v {JOINS} ORDER BY {ORDER_BY}");
        sqlx::query_as::<_, Vehicle>(&query).fetch_all(pool).await
    }

    /// List the vehicles of one driver by name.
    pub async fn list_by_driver(
        pool: &PgPool,
        driver_id: DbId,
    ) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles v WHERE v.driver_id = $1 ORDER BY v.name, v.id"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(driver_id)
            .fetch_all(pool)
            .await
    }

    /// List all vehicles in default order with driver and class labels.
    pub async fn list_with_labels(pool: &PgPool) -> Result<Vec<VehicleListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {LABELS} FROM vehicles v {JOINS} ORDER BY {ORDER_BY}"
        );
        sqlx::query_as::<_, VehicleListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find one vehicle with driver and class labels.
    pub async fn find_with_labels(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VehicleListItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS}, {LABELS} FROM vehicles v {JOINS} WHERE v.id = $1");
        sqlx::query_as::<_, VehicleListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace every editable column of a vehicle.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewVehicle,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE vehicles AS v SET
                driver_id = $2,
                race_class_id = $3,
                name = $4,
                default_start_number = $5,
                notes = $6,
                is_active = $7
             WHERE v.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(input.driver_id)
            .bind(input.race_class_id)
            .bind(&input.name)
            .bind(input.default_start_number)
            .bind(&input.notes)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a vehicle. Runs that used it keep their rows.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "vehicles", id).await
    }
}
