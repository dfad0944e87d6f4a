//! Route definitions for authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// JSON routes mounted at `/api/v1/auth`.
///
/// ```text
/// POST /login    -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}

/// Screen routes mounted at the root.
///
/// ```text
/// GET  /login/   -> login_form
/// POST /login/   -> login_submit
/// POST /logout/  -> logout
/// ```
pub fn screen_router() -> Router<AppState> {
    Router::new()
        .route("/login/", get(auth::login_form).post(auth::login_submit))
        .route("/logout/", post(auth::logout))
}
