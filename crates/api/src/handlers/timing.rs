//! Create/read endpoints for the timing records written by gate and OCR
//! collaborators: runs, passages, captures, OCR results and leaderboards.
//!
//! No business validation beyond enumerated values happens here; referential
//! integrity is left to the database. Writes require `operator` or `admin`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rallycontrol_core::error::CoreError;
use rallycontrol_core::types::DbId;
use rallycontrol_db::models::capture::{Capture, NewCapture};
use rallycontrol_db::models::leaderboard::{Leaderboard, NewLeaderboard};
use rallycontrol_db::models::ocr_result::{NewOcrResult, OcrResult};
use rallycontrol_db::models::passage::{NewPassage, Passage, PassageFilter};
use rallycontrol_db::models::run::{NewRun, Run, RunFilter};
use rallycontrol_db::repositories::{
    CaptureRepo, LeaderboardRepo, OcrResultRepo, PassageRepo, RunRepo,
};

use super::input::ChoiceFields;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireOperator};
use crate::response::DataResponse;
use crate::state::AppState;

type Created<T> = AppResult<(StatusCode, Json<DataResponse<T>>)>;

fn created<T: serde::Serialize>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// POST /api/v1/runs
pub async fn create_run(
    State(state): State<AppState>,
    RequireOperator(user): RequireOperator,
    Json(input): Json<NewRun>,
) -> Created<Run> {
    input.check_choices()?;
    let run = RunRepo::create(&state.pool, &input).await?;
    tracing::info!(entity = "Run", id = run.id, user_id = user.user_id, "Created");
    created(run)
}

/// GET /api/v1/runs?session_id=&driver_id=
pub async fn list_runs(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(filter): Query<RunFilter>,
) -> AppResult<Json<DataResponse<Vec<Run>>>> {
    let runs = RunRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: runs }))
}

/// GET /api/v1/runs/{id}
pub async fn get_run(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Run>>> {
    let run = RunRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Run", id))?;
    Ok(Json(DataResponse { data: run }))
}

// ---------------------------------------------------------------------------
// Passages
// ---------------------------------------------------------------------------

/// POST /api/v1/passages
///
/// `received_at` defaults to the time of insertion.
pub async fn create_passage(
    State(state): State<AppState>,
    RequireOperator(user): RequireOperator,
    Json(input): Json<NewPassage>,
) -> Created<Passage> {
    input.check_choices()?;
    let passage = PassageRepo::create(&state.pool, &input).await?;
    tracing::info!(entity = "Passage", id = passage.id, user_id = user.user_id, "Created");
    created(passage)
}

/// GET /api/v1/passages?session_id=&gate_id=&run_id=
pub async fn list_passages(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(filter): Query<PassageFilter>,
) -> AppResult<Json<DataResponse<Vec<Passage>>>> {
    let passages = PassageRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: passages }))
}

/// GET /api/v1/passages/{id}
pub async fn get_passage(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Passage>>> {
    let passage = PassageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Passage", id))?;
    Ok(Json(DataResponse { data: passage }))
}

// ---------------------------------------------------------------------------
// Captures and OCR results
// ---------------------------------------------------------------------------

/// POST /api/v1/captures
pub async fn create_capture(
    State(state): State<AppState>,
    RequireOperator(user): RequireOperator,
    Json(input): Json<NewCapture>,
) -> Created<Capture> {
    let capture = CaptureRepo::create(&state.pool, &input).await?;
    tracing::info!(entity = "Capture", id = capture.id, user_id = user.user_id, "Created");
    created(capture)
}

/// GET /api/v1/passages/{id}/captures
pub async fn list_passage_captures(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(passage_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Capture>>>> {
    let captures = CaptureRepo::list_by_passage(&state.pool, passage_id).await?;
    Ok(Json(DataResponse { data: captures }))
}

/// POST /api/v1/ocr-results
pub async fn create_ocr_result(
    State(state): State<AppState>,
    RequireOperator(user): RequireOperator,
    Json(input): Json<NewOcrResult>,
) -> Created<OcrResult> {
    input.check_choices()?;
    let result = OcrResultRepo::create(&state.pool, &input).await?;
    tracing::info!(entity = "OcrResult", id = result.id, user_id = user.user_id, "Created");
    created(result)
}

/// GET /api/v1/captures/{id}/ocr-results
pub async fn list_capture_ocr_results(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(capture_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<OcrResult>>>> {
    let results = OcrResultRepo::list_by_capture(&state.pool, capture_id).await?;
    Ok(Json(DataResponse { data: results }))
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// POST /api/v1/leaderboards
///
/// Stores a generated snapshot; `data_json` is kept as given.
pub async fn create_leaderboard(
    State(state): State<AppState>,
    RequireOperator(user): RequireOperator,
    Json(input): Json<NewLeaderboard>,
) -> Created<Leaderboard> {
    let leaderboard = LeaderboardRepo::create(&state.pool, &input).await?;
    tracing::info!(entity = "Leaderboard", id = leaderboard.id, user_id = user.user_id, "Created");
    created(leaderboard)
}

/// GET /api/v1/sessions/{id}/leaderboards
pub async fn list_session_leaderboards(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Leaderboard>>>> {
    let leaderboards = LeaderboardRepo::list_by_session(&state.pool, session_id).await?;
    Ok(Json(DataResponse { data: leaderboards }))
}
