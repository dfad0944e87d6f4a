//! Handlers for authentication: the JSON login endpoint and the cookie-based
//! login/logout screens.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use rallycontrol_core::error::CoreError;
use rallycontrol_db::models::user::{User, UserResponse};
use rallycontrol_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::cookies::{clear_cookie, set_cookie, SESSION_COOKIE};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult, HtmlResult};
use crate::flash::IncomingFlash;
use crate::state::AppState;
use crate::templates::{Page, LOGIN};

const LOGIN_TITLE: &str = "Anmelden";
const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Form body of `POST /login/`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Query string of `GET /login/`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    error: Option<&'a str>,
    next: &'a str,
    login_username: &'a str,
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = authenticate(&state, &input.username, &input.password).await?;
    let access_token = issue_token(&state, &user)?;

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(&user),
    }))
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// GET /login/
pub async fn login_form(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Query(query): Query<LoginQuery>,
) -> HtmlResult<Response> {
    let next = safe_next(query.next.as_deref());
    render_login(&state, &flash, StatusCode::OK, None, next, "")
}

/// POST /login/
///
/// On success stores the token in the session cookie and redirects to
/// `next` (same-site paths only); otherwise re-renders the form.
pub async fn login_submit(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(form): Form<LoginForm>,
) -> HtmlResult<Response> {
    let next = safe_next(form.next.as_deref());

    let user = match authenticate(&state, form.username.trim(), &form.password).await {
        Ok(user) => user,
        Err(err @ AppError::Core(CoreError::Unauthorized(_) | CoreError::Forbidden(_))) => {
            let (status, _, _) = err.parts();
            let message = match err {
                AppError::Core(CoreError::Forbidden(_)) => "Dieses Konto ist deaktiviert.",
                _ => "Benutzername oder Passwort ist falsch.",
            };
            return render_login(&state, &flash, status, Some(message), next, form.username.trim());
        }
        Err(err) => return Err(err.into()),
    };

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = user.id, "Screen login");

    let cookie = set_cookie(
        SESSION_COOKIE,
        &token,
        Some(state.config.jwt.expires_in_secs()),
        state.config.cookie_secure,
    );
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(next)).into_response())
}

/// POST /logout/
pub async fn logout() -> Response {
    (
        AppendHeaders([(SET_COOKIE, clear_cookie(SESSION_COOKIE))]),
        Redirect::to("/login/"),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up a user and check the password.
///
/// Credentials are checked first so a wrong password reveals nothing about
/// the account; only a valid password on an inactive account is `Forbidden`.
async fn authenticate(state: &AppState, username: &str, password: &str) -> AppResult<User> {
    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Failed login");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    Ok(user)
}

fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    generate_access_token(user.id, &user.role, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}

/// Only same-site absolute paths are followed after login.
///
/// Browsers read `/\host` like `//host`, so backslashes are refused outright.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\') =>
        {
            path
        }
        _ => "/",
    }
}

fn render_login(
    state: &AppState,
    flash: &IncomingFlash,
    status: StatusCode,
    error: Option<&str>,
    next: &str,
    username: &str,
) -> HtmlResult<Response> {
    let body = LoginBody {
        error,
        next,
        login_username: username,
    };
    let page = Page::new(LOGIN_TITLE, "/login/", None, flash, body);
    state.templates.respond(status, LOGIN, &page, flash)
}
