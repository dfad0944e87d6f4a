//! Extractors for the server-rendered screens.
//!
//! Unauthenticated requests are redirected to the login screen with the
//! requested path in `next`; authorization failures render an HTML 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use rallycontrol_core::error::CoreError;
use rallycontrol_core::roles::can_write;

use super::auth::AuthUser;
use crate::error::{AppError, HtmlError};
use crate::state::AppState;

/// Any authenticated user; redirects to `/login/` otherwise.
pub struct ScreenUser(pub AuthUser);

impl FromRequestParts<AppState> for ScreenUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(ScreenUser(user)),
            Err(_) => Err(login_redirect(parts.uri.path()).into_response()),
        }
    }
}

/// A user allowed to create and edit master data (`operator` or `admin`).
pub struct ScreenWriter(pub AuthUser);

impl FromRequestParts<AppState> for ScreenWriter {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ScreenUser(user) = ScreenUser::from_request_parts(parts, state).await?;
        if !can_write(&user.role) {
            return Err(HtmlError(AppError::Core(CoreError::Forbidden(
                "Keine Berechtigung zum Bearbeiten von Stammdaten.".into(),
            )))
            .into_response());
        }
        Ok(ScreenWriter(user))
    }
}

/// Redirect to the login screen, returning to `path` afterwards.
pub fn login_redirect(path: &str) -> Redirect {
    if path == "/" {
        Redirect::to("/login/")
    } else {
        Redirect::to(&format!("/login/?next={}", path.replace('&', "%26")))
    }
}
