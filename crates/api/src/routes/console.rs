//! Route definitions for the administrative console.

use axum::routing::get;
use axum::Router;

use crate::handlers::console;
use crate::state::AppState;

/// Routes mounted at `/console`.
///
/// ```text
/// GET    /                 -> list_specs
/// GET    /{entity}         -> list_rows
/// POST   /{entity}         -> create_row (admin only)
/// GET    /{entity}/{id}    -> get_row
/// PUT    /{entity}/{id}    -> update_row (admin only)
/// DELETE /{entity}/{id}    -> delete_row (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(console::list_specs))
        .route(
            "/{entity}",
            get(console::list_rows).post(console::create_row),
        )
        .route(
            "/{entity}/{id}",
            get(console::get_row)
                .put(console::update_row)
                .delete(console::delete_row),
        )
}
