//! Repository for the `sessions` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{NewSession, Session, SessionListItem};

/// Column list, qualified with the `se` alias used by every query.
const COLUMNS: &str = "se.id, se.stage_id, se.name, se.session_type, se.status, \
                       se.start_time, se.end_time, se.created_at, se.updated_at";

/// Stage and event joins needed for ordering and labels.
const JOINS: &str = "JOIN stages s ON s.id = se.stage_id JOIN events e ON e.id = s.event_id";

/// Default ordering: stage order, then start time, then name.
const ORDER_BY: &str =
    "e.start_date DESC, e.name, e.id, s.stage_order, s.id, se.start_time, se.name, se.id";

/// Provides CRUD operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions AS se (stage_id, name, session_type, status, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.stage_id)
            .bind(&input.name)
            .bind(&input.session_type)
            .bind(&input.status)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions se WHERE se.id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sessions in default order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions se {JOINS} ORDER BY {ORDER_BY}");
        sqlx::query_as::<_, Session>(&query).fetch_all(pool).await
    }

    /// List all sessions in default order with stage and event names.
    pub async fn list_with_labels(pool: &PgPool) -> Result<Vec<SessionListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, s.name AS stage_name, e.name AS event_name
             FROM sessions se {JOINS}
             ORDER BY {ORDER_BY}"
        );
        sqlx::query_as::<_, SessionListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find one session with stage and event names.
    pub async fn find_with_labels(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SessionListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, s.name AS stage_name, e.name AS event_name
             FROM sessions se {JOINS}
             WHERE se.id = $1"
        );
        sqlx::query_as::<_, SessionListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace every editable column of a session.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewSession,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions AS se SET
                stage_id = $2,
                name = $3,
                session_type = $4,
                status = $5,
                start_time = $6,
                end_time = $7
             WHERE se.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(input.stage_id)
            .bind(&input.name)
            .bind(&input.session_type)
            .bind(&input.status)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_optional(pool)
            .await
    }

    /// Delete a session with its runs, passages and leaderboards.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "sessions", id).await
    }
}
