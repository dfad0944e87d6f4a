//! Route definitions for the timing collaborator endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::timing;
use crate::state::AppState;

/// Routes mounted at `/api/v1`.
///
/// ```text
/// POST|GET /runs                          -> create_run, list_runs
/// GET      /runs/{id}                     -> get_run
/// POST|GET /passages                      -> create_passage, list_passages
/// GET      /passages/{id}                 -> get_passage
/// GET      /passages/{id}/captures        -> list_passage_captures
/// POST     /captures                      -> create_capture
/// GET      /captures/{id}/ocr-results     -> list_capture_ocr_results
/// POST     /ocr-results                   -> create_ocr_result
/// POST     /leaderboards                  -> create_leaderboard
/// GET      /sessions/{id}/leaderboards    -> list_session_leaderboards
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/runs", get(timing::list_runs).post(timing::create_run))
        .route("/runs/{id}", get(timing::get_run))
        .route(
            "/passages",
            get(timing::list_passages).post(timing::create_passage),
        )
        .route("/passages/{id}", get(timing::get_passage))
        .route("/passages/{id}/captures", get(timing::list_passage_captures))
        .route("/captures", post(timing::create_capture))
        .route(
            "/captures/{id}/ocr-results",
            get(timing::list_capture_ocr_results),
        )
        .route("/ocr-results", post(timing::create_ocr_result))
        .route("/leaderboards", post(timing::create_leaderboard))
        .route(
            "/sessions/{id}/leaderboards",
            get(timing::list_session_leaderboards),
        )
}
