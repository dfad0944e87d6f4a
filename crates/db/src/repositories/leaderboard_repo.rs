//! Repository for the `leaderboards` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::leaderboard::{Leaderboard, NewLeaderboard};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, race_class_id, generated_at, data_json, checksum";

/// Provides create and read operations for cached leaderboards.
pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// Store a leaderboard payload, returning the created row.
    ///
    /// `generated_at` defaults to now when not given.
    pub async fn create(
        pool: &PgPool,
        input: &NewLeaderboard,
    ) -> Result<Leaderboard, sqlx::Error> {
        let query = format!(
            "INSERT INTO leaderboards (session_id, race_class_id, generated_at, data_json, checksum)
             VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Leaderboard>(&query)
            .bind(input.session_id)
            .bind(input.race_class_id)
            .bind(input.generated_at)
            .bind(&input.data_json)
            .bind(&input.checksum)
            .fetch_one(pool)
            .await
    }

    /// Find a leaderboard by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Leaderboard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leaderboards WHERE id = $1");
        sqlx::query_as::<_, Leaderboard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the leaderboards of a session, most recently generated first.
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Leaderboard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leaderboards
             WHERE session_id = $1
             ORDER BY generated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Leaderboard>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every column of a leaderboard.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewLeaderboard,
    ) -> Result<Option<Leaderboard>, sqlx::Error> {
        let query = format!(
            "UPDATE leaderboards SET
                session_id = $2,
                race_class_id = $3,
                generated_at = COALESCE($4, generated_at),
                data_json = $5,
                checksum = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Leaderboard>(&query)
            .bind(id)
            .bind(input.session_id)
            .bind(input.race_class_id)
            .bind(input.generated_at)
            .bind(&input.data_json)
            .bind(&input.checksum)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "leaderboards", id).await
    }
}
