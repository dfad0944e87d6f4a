//! Generic list/create/update screens, parameterised by a [`MasterEntity`].
//!
//! Writes require `operator` or `admin` via [`ScreenWriter`]; the list is
//! visible to every authenticated user.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use rallycontrol_core::error::CoreError;
use rallycontrol_core::forms::{FieldErrors, FormData};
use rallycontrol_core::roles::can_write;
use rallycontrol_core::types::DbId;
use rallycontrol_db::error::constraint_violation;
use serde::Serialize;

use crate::error::{AppError, HtmlResult};
use crate::flash::{flash_cookie, IncomingFlash};
use crate::forms::RenderedField;
use crate::middleware::auth::AuthUser;
use crate::middleware::screen::{ScreenUser, ScreenWriter};
use crate::screens::MasterEntity;
use crate::state::AppState;
use crate::templates::{Page, GENERIC_FORM, GENERIC_LIST};

/// Non-field error shown when the database rejects a write.
const CONSTRAINT_MESSAGE: &str =
    "Der Eintrag widerspricht einem bestehenden Datensatz (z. B. doppelter Wert oder ungültige Referenz).";

// ---------------------------------------------------------------------------
// Template bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ListRow {
    cells: Vec<String>,
    edit_url: String,
}

#[derive(Debug, Serialize)]
struct ListBody {
    verbose_name: &'static str,
    columns: Vec<String>,
    column_span: usize,
    rows: Vec<ListRow>,
    create_url: String,
    can_write: bool,
}

#[derive(Debug, Serialize)]
struct FormBody {
    action: String,
    cancel_url: String,
    fields: Vec<RenderedField>,
    non_field_errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /{slug}/
///
/// Every record in default order with the resolved list columns.
pub async fn list<E: MasterEntity>(
    State(state): State<AppState>,
    ScreenUser(user): ScreenUser,
    flash: IncomingFlash,
) -> HtmlResult<Response> {
    let meta = E::META;
    let screen = state.screens.get(meta.slug).ok_or_else(|| {
        AppError::Core(CoreError::Config(format!(
            "no list screen registered for '{}'",
            meta.slug
        )))
    })?;

    let records = E::list(&state.pool).await?;
    let rows = records
        .iter()
        .map(|record| ListRow {
            cells: screen.cells(E::columns(), record),
            edit_url: meta.edit_url(E::id(record)),
        })
        .collect();

    let columns: Vec<String> = screen.columns.iter().map(|c| c.label.clone()).collect();
    let body = ListBody {
        verbose_name: meta.verbose_name,
        column_span: columns.len() + 1,
        columns,
        rows,
        create_url: meta.create_url(),
        can_write: can_write(&user.role),
    };

    let page = Page::new(&screen.title, &meta.list_url(), Some(&user), &flash, body);
    state
        .templates
        .respond(StatusCode::OK, GENERIC_LIST, &page, &flash)
}

/// GET /{slug}/new/
pub async fn create_form<E: MasterEntity>(
    State(state): State<AppState>,
    ScreenWriter(user): ScreenWriter,
    flash: IncomingFlash,
) -> HtmlResult<Response> {
    let meta = E::META;
    render_form::<E>(
        &state,
        &user,
        &flash,
        StatusCode::OK,
        meta.create_title,
        meta.create_url(),
        &E::defaults(),
        &FieldErrors::new(),
    )
    .await
}

/// POST /{slug}/new/
pub async fn create<E: MasterEntity>(
    State(state): State<AppState>,
    ScreenWriter(user): ScreenWriter,
    flash: IncomingFlash,
    Form(submitted): Form<HashMap<String, String>>,
) -> HtmlResult<Response> {
    let meta = E::META;
    let data = E::form().whitelist(FormData::from(submitted));

    let input = match E::validate(&data) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(entity = meta.model_name, errors = %errors.summary(), "Form invalid");
            return render_form::<E>(
                &state,
                &user,
                &flash,
                StatusCode::BAD_REQUEST,
                meta.create_title,
                meta.create_url(),
                &data,
                &errors,
            )
            .await;
        }
    };

    match E::insert(&state.pool, &input).await {
        Ok(record) => {
            tracing::info!(entity = meta.model_name, id = E::id(&record), user_id = user.user_id, "Created");
            Ok(saved(&state, &meta.list_url(), &format!("{record} gespeichert.")))
        }
        Err(err) => {
            rejected_write::<E>(&state, &user, &flash, meta.create_title, meta.create_url(), &data, err)
                .await
        }
    }
}

/// GET /{slug}/{id}/edit/
pub async fn edit_form<E: MasterEntity>(
    State(state): State<AppState>,
    ScreenWriter(user): ScreenWriter,
    flash: IncomingFlash,
    Path(id): Path<DbId>,
) -> HtmlResult<Response> {
    let meta = E::META;
    let record = find_or_404::<E>(&state, id).await?;
    render_form::<E>(
        &state,
        &user,
        &flash,
        StatusCode::OK,
        meta.update_title,
        meta.edit_url(id),
        &E::initial(&record),
        &FieldErrors::new(),
    )
    .await
}

/// POST /{slug}/{id}/edit/
pub async fn update<E: MasterEntity>(
    State(state): State<AppState>,
    ScreenWriter(user): ScreenWriter,
    flash: IncomingFlash,
    Path(id): Path<DbId>,
    Form(submitted): Form<HashMap<String, String>>,
) -> HtmlResult<Response> {
    let meta = E::META;
    find_or_404::<E>(&state, id).await?;
    let data = E::form().whitelist(FormData::from(submitted));

    let input = match E::validate(&data) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(entity = meta.model_name, id, errors = %errors.summary(), "Form invalid");
            return render_form::<E>(
                &state,
                &user,
                &flash,
                StatusCode::BAD_REQUEST,
                meta.update_title,
                meta.edit_url(id),
                &data,
                &errors,
            )
            .await;
        }
    };

    match E::update(&state.pool, id, &input).await {
        Ok(Some(record)) => {
            tracing::info!(entity = meta.model_name, id, user_id = user.user_id, "Updated");
            Ok(saved(&state, &meta.list_url(), &format!("{record} aktualisiert.")))
        }
        // Deleted between lookup and write.
        Ok(None) => Err(not_found::<E>(id).into()),
        Err(err) => {
            rejected_write::<E>(&state, &user, &flash, meta.update_title, meta.edit_url(id), &data, err)
                .await
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found<E: MasterEntity>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: E::META.model_name,
        id,
    })
}

async fn find_or_404<E: MasterEntity>(state: &AppState, id: DbId) -> HtmlResult<E::Record> {
    E::find(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<E>(id).into())
}

/// Redirect to the list, carrying the acknowledgement in the flash cookie.
fn saved(state: &AppState, list_url: &str, message: &str) -> Response {
    (
        AppendHeaders([(SET_COOKIE, flash_cookie(message, state))]),
        Redirect::to(list_url),
    )
        .into_response()
}

/// Re-render the form for a write the database refused on a constraint;
/// any other failure propagates.
async fn rejected_write<E: MasterEntity>(
    state: &AppState,
    user: &AuthUser,
    flash: &IncomingFlash,
    title: &str,
    action: String,
    data: &FormData,
    err: sqlx::Error,
) -> HtmlResult<Response> {
    let Some(violation) = constraint_violation(&err) else {
        return Err(err.into());
    };
    tracing::warn!(
        entity = E::META.model_name,
        kind = violation.kind.as_str(),
        constraint = %violation.constraint,
        user_id = user.user_id,
        "Write rejected by database constraint"
    );
    render_form::<E>(
        state,
        user,
        flash,
        StatusCode::CONFLICT,
        title,
        action,
        data,
        &FieldErrors::non_field(CONSTRAINT_MESSAGE),
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn render_form<E: MasterEntity>(
    state: &AppState,
    user: &AuthUser,
    flash: &IncomingFlash,
    status: StatusCode,
    title: &str,
    action: String,
    values: &FormData,
    errors: &FieldErrors,
) -> HtmlResult<Response> {
    let meta = E::META;
    let body = FormBody {
        fields: E::form().render(&state.pool, values, errors).await?,
        non_field_errors: errors.non_field_errors().to_vec(),
        cancel_url: meta.list_url(),
        action: action.clone(),
    };
    let page = Page::new(title, &action, Some(user), flash, body);
    state.templates.respond(status, GENERIC_FORM, &page, flash)
}
