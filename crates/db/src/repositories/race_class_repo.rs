//! Repository for the `classes` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::race_class::{NewRaceClass, RaceClass};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Provides CRUD operations for race classes.
pub struct RaceClassRepo;

impl RaceClassRepo {
    /// Insert a new race class, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewRaceClass) -> Result<RaceClass, sqlx::Error> {
        let query = format!(
            "INSERT INTO classes (name, description, is_active)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RaceClass>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a race class by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RaceClass>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classes WHERE id = $1");
        sqlx::query_as::<_, RaceClass>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all race classes ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<RaceClass>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classes ORDER BY name, id");
        sqlx::query_as::<_, RaceClass>(&query).fetch_all(pool).await
    }

    /// `(id, name)` pairs for select widgets.
    pub async fn choices(pool: &PgPool) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as("SELECT id, name FROM classes ORDER BY name, id")
            .fetch_all(pool)
            .await
    }

    /// Replace every editable column of a race class.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewRaceClass,
    ) -> Result<Option<RaceClass>, sqlx::Error> {
        let query = format!(
            "UPDATE classes SET
                name = $2,
                description = $3,
                is_active = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RaceClass>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a race class. Drivers, vehicles and leaderboards keep their
    /// rows with the class reference cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "classes", id).await
    }
}
