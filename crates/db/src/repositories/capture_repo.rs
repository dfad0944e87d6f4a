//! Repository for the `captures` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::capture::{Capture, NewCapture};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, passage_id, image_path, captured_at_ms, width, height, sha256, created_at";

/// Provides create and read operations for camera captures.
pub struct CaptureRepo;

impl CaptureRepo {
    /// Insert a new capture, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewCapture) -> Result<Capture, sqlx::Error> {
        let query = format!(
            "INSERT INTO captures (passage_id, image_path, captured_at_ms, width, height, sha256)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Capture>(&query)
            .bind(input.passage_id)
            .bind(&input.image_path)
            .bind(input.captured_at_ms)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.sha256)
            .fetch_one(pool)
            .await
    }

    /// Find a capture by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Capture>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM captures WHERE id = $1");
        sqlx::query_as::<_, Capture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the captures of a passage, newest first.
    pub async fn list_by_passage(
        pool: &PgPool,
        passage_id: DbId,
    ) -> Result<Vec<Capture>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM captures WHERE passage_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Capture>(&query)
            .bind(passage_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every column of a capture.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewCapture,
    ) -> Result<Option<Capture>, sqlx::Error> {
        let query = format!(
            "UPDATE captures SET
                passage_id = $2,
                image_path = $3,
                captured_at_ms = $4,
                width = $5,
                height = $6,
                sha256 = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Capture>(&query)
            .bind(id)
            .bind(input.passage_id)
            .bind(&input.image_path)
            .bind(input.captured_at_ms)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.sha256)
            .fetch_optional(pool)
            .await
    }

    /// Delete a capture and its OCR results.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "captures", id).await
    }
}
