//! Repository for the `events` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{Event, NewEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, location, start_date, end_date, timezone, notes, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (name, location, start_date, end_date, timezone, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.timezone)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find an event by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all events, most recent start date first, then by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events ORDER BY start_date DESC, name, id");
        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// `(id, "name (start_date)")` pairs for select widgets.
    pub async fn choices(pool: &PgPool) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, name || ' (' || to_char(start_date, 'YYYY-MM-DD') || ')'
             FROM events
             ORDER BY start_date DESC, name, id",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace every editable column of an event.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                name = $2,
                location = $3,
                start_date = $4,
                end_date = $5,
                timezone = $6,
                notes = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.timezone)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event and, by cascade, its stages, sessions and everything
    /// recorded in them.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "events", id).await
    }
}
