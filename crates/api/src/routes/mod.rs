pub mod auth;
pub mod console;
pub mod health;
pub mod screens;
pub mod timing;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
///
/// /console                                         entity specs
/// /console/{entity}                                search, create (admin)
/// /console/{entity}/{id}                           get, replace, delete (admin)
///
/// /runs, /runs/{id}                                timing runs
/// /passages, /passages/{id}                        gate passages
/// /passages/{id}/captures                          captures of a passage
/// /captures                                        create capture
/// /captures/{id}/ocr-results                       OCR results of a capture
/// /ocr-results                                     create OCR result
/// /leaderboards                                    create snapshot
/// /sessions/{id}/leaderboards                      snapshots of a session
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (JSON login).
        .nest("/auth", auth::router())
        // Administrative console over every entity.
        .nest("/console", console::router())
        // Timing collaborators.
        .merge(timing::router())
}
