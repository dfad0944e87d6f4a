//! OCR result entity model and DTOs.

use std::fmt;

use rallycontrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::default_ocr_status;

/// A row from the `ocr_results` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OcrResult {
    pub id: DbId,
    pub capture_id: DbId,
    pub detected_number: Option<i32>,
    pub confidence: f64,
    pub engine: String,
    pub processing_ms: Option<i32>,
    pub status: String,
    pub raw_text: Option<String>,
    pub created_at: Timestamp,
}

impl fmt::Display for OcrResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detected_number {
            Some(n) => write!(f, "OCR {n} ({})", self.engine),
            None => write!(f, "OCR ? ({})", self.engine),
        }
    }
}

/// DTO for creating or fully replacing an OCR result.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOcrResult {
    pub capture_id: DbId,
    pub detected_number: Option<i32>,
    pub confidence: f64,
    pub engine: String,
    pub processing_ms: Option<i32>,
    #[serde(default = "default_ocr_status")]
    pub status: String,
    pub raw_text: Option<String>,
}
