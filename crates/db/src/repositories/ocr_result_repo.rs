//! Repository for the `ocr_results` table.

use rallycontrol_core::types::DbId;
use sqlx::PgPool;

use crate::models::ocr_result::{NewOcrResult, OcrResult};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, capture_id, detected_number, confidence, engine, processing_ms, \
                       status, raw_text, created_at";

/// Provides create and read operations for OCR results.
pub struct OcrResultRepo;

impl OcrResultRepo {
    /// Insert a new OCR result, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewOcrResult) -> Result<OcrResult, sqlx::Error> {
        let query = format!(
            "INSERT INTO ocr_results (capture_id, detected_number, confidence, engine,
                                      processing_ms, status, raw_text)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OcrResult>(&query)
            .bind(input.capture_id)
            .bind(input.detected_number)
            .bind(input.confidence)
            .bind(&input.engine)
            .bind(input.processing_ms)
            .bind(&input.status)
            .bind(&input.raw_text)
            .fetch_one(pool)
            .await
    }

    /// Find an OCR result by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OcrResult>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ocr_results WHERE id = $1");
        sqlx::query_as::<_, OcrResult>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the OCR results of a capture, newest first.
    pub async fn list_by_capture(
        pool: &PgPool,
        capture_id: DbId,
    ) -> Result<Vec<OcrResult>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ocr_results
             WHERE capture_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, OcrResult>(&query)
            .bind(capture_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every column of an OCR result.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewOcrResult,
    ) -> Result<Option<OcrResult>, sqlx::Error> {
        let query = format!(
            "UPDATE ocr_results SET
                capture_id = $2,
                detected_number = $3,
                confidence = $4,
                engine = $5,
                processing_ms = $6,
                status = $7,
                raw_text = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OcrResult>(&query)
            .bind(id)
            .bind(input.capture_id)
            .bind(input.detected_number)
            .bind(input.confidence)
            .bind(&input.engine)
            .bind(input.processing_ms)
            .bind(&input.status)
            .bind(&input.raw_text)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "ocr_results", id).await
    }
}
