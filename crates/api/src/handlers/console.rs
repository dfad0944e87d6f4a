//! Handlers for the administrative console at `/api/v1/console`.
//!
//! Reads are open to every authenticated user. Writes accept every column of
//! the entity (not just the screen form fields) and require `admin`.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rallycontrol_core::error::CoreError;
use rallycontrol_core::roles::DEFAULT_ROLE;
use rallycontrol_core::types::DbId;
use rallycontrol_db::console::{spec_for, ConsoleSpec, CONSOLE_SPECS};
use rallycontrol_db::models::capture::NewCapture;
use rallycontrol_db::models::driver::NewDriver;
use rallycontrol_db::models::event::NewEvent;
use rallycontrol_db::models::gate::NewGate;
use rallycontrol_db::models::leaderboard::NewLeaderboard;
use rallycontrol_db::models::ocr_result::NewOcrResult;
use rallycontrol_db::models::passage::NewPassage;
use rallycontrol_db::models::race_class::NewRaceClass;
use rallycontrol_db::models::run::NewRun;
use rallycontrol_db::models::session::NewSession;
use rallycontrol_db::models::stage::NewStage;
use rallycontrol_db::models::user::{CreateUser, UpdateUser};
use rallycontrol_db::models::vehicle::NewVehicle;
use rallycontrol_db::repositories::{
    CaptureRepo, ConsoleRepo, DriverRepo, EventRepo, GateRepo, LeaderboardRepo, OcrResultRepo,
    PassageRepo, RaceClassRepo, RunRepo, SessionRepo, StageRepo, UserRepo, VehicleRepo,
};
use rallycontrol_db::DbPool;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::input::{check_role, parse_body, ChoiceFields};
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One page of console rows.
#[derive(Debug, Serialize)]
pub struct ConsoleListing {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub rows: Vec<Value>,
}

/// Console body for creating a user. The password is hashed before storage.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Console body for replacing a user; a present `password` is reset too.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub profile: UpdateUser,
    pub password: Option<String>,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_active() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/console
///
/// Every console entity with its columns, filters and search fields.
pub async fn list_specs(
    RequireAuth(_user): RequireAuth,
) -> Json<DataResponse<&'static [ConsoleSpec]>> {
    Json(DataResponse {
        data: CONSOLE_SPECS,
    })
}

/// GET /api/v1/console/{entity}?q=&<filter>=&limit=&offset=
pub async fn list_rows(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(entity): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> AppResult<Json<DataResponse<ConsoleListing>>> {
    let spec = resolve_spec(&entity)?;
    let query = spec.resolve_query(&params)?;
    let page = ConsoleRepo::search(&state.pool, spec, &query).await?;

    Ok(Json(DataResponse {
        data: ConsoleListing {
            total: page.total,
            limit: query.limit,
            offset: query.offset,
            rows: page.rows,
        },
    }))
}

/// GET /api/v1/console/{entity}/{id}
pub async fn get_row(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path((entity, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<Value>>> {
    let spec = resolve_spec(&entity)?;
    let row = find_row(&state.pool, spec, id).await?;
    Ok(Json(DataResponse { data: row }))
}

/// POST /api/v1/console/{entity}
pub async fn create_row(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(entity): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Value>>)> {
    let spec = resolve_spec(&entity)?;
    let id = write(&state.pool, spec, None, body)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("{} insert returned no row", spec.slug)))?;

    tracing::info!(entity = spec.slug, id, user_id = admin.user_id, "Console create");
    let row = find_row(&state.pool, spec, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// PUT /api/v1/console/{entity}/{id}
pub async fn update_row(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((entity, id)): Path<(String, DbId)>,
    Json(body): Json<Value>,
) -> AppResult<Json<DataResponse<Value>>> {
    let spec = resolve_spec(&entity)?;
    write(&state.pool, spec, Some(id), body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: spec.verbose_name,
            id,
        }))?;

    tracing::info!(entity = spec.slug, id, user_id = admin.user_id, "Console update");
    let row = find_row(&state.pool, spec, id).await?;
    Ok(Json(DataResponse { data: row }))
}

/// DELETE /api/v1/console/{entity}/{id}
///
/// Dependent rows follow the schema's cascade and set-null rules.
pub async fn delete_row(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((entity, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let spec = resolve_spec(&entity)?;
    if !ConsoleRepo::delete(&state.pool, spec, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: spec.verbose_name,
            id,
        }));
    }
    tracing::info!(entity = spec.slug, id, user_id = admin.user_id, "Console delete");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_spec(entity: &str) -> AppResult<&'static ConsoleSpec> {
    spec_for(entity).ok_or_else(|| AppError::NotFound(format!("Unknown console entity '{entity}'")))
}

async fn find_row(pool: &DbPool, spec: &ConsoleSpec, id: DbId) -> AppResult<Value> {
    ConsoleRepo::find(pool, spec, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: spec.verbose_name,
            id,
        }))
}

/// Insert (`id = None`) or replace one row via the entity's typed DTO.
macro_rules! upsert {
    ($pool:expr, $slug:expr, $id:expr, $body:expr, $repo:ident, $input:ty) => {{
        let input: $input = parse_body($slug, $body)?;
        input.check_choices()?;
        match $id {
            None => Some($repo::create($pool, &input).await?.id),
            Some(id) => $repo::update($pool, id, &input).await?.map(|row| row.id),
        }
    }};
}

/// Returns the written row's id, or `None` when `id` names no row.
async fn write(
    pool: &DbPool,
    spec: &ConsoleSpec,
    id: Option<DbId>,
    body: Value,
) -> AppResult<Option<DbId>> {
    let slug = spec.slug;
    let written = match slug {
        "users" => write_user(pool, id, body).await?,
        "classes" => upsert!(pool, slug, id, body, RaceClassRepo, NewRaceClass),
        "drivers" => upsert!(pool, slug, id, body, DriverRepo, NewDriver),
        "events" => upsert!(pool, slug, id, body, EventRepo, NewEvent),
        "stages" => upsert!(pool, slug, id, body, StageRepo, NewStage),
        "sessions" => upsert!(pool, slug, id, body, SessionRepo, NewSession),
        "gates" => upsert!(pool, slug, id, body, GateRepo, NewGate),
        "vehicles" => upsert!(pool, slug, id, body, VehicleRepo, NewVehicle),
        "runs" => upsert!(pool, slug, id, body, RunRepo, NewRun),
        "passages" => upsert!(pool, slug, id, body, PassageRepo, NewPassage),
        "captures" => upsert!(pool, slug, id, body, CaptureRepo, NewCapture),
        "ocr-results" => upsert!(pool, slug, id, body, OcrResultRepo, NewOcrResult),
        "leaderboards" => upsert!(pool, slug, id, body, LeaderboardRepo, NewLeaderboard),
        other => {
            return Err(AppError::NotFound(format!(
                "Console entity '{other}' does not accept writes"
            )))
        }
    };
    Ok(written)
}

async fn write_user(pool: &DbPool, id: Option<DbId>, body: Value) -> AppResult<Option<DbId>> {
    match id {
        None => {
            let input: CreateUserRequest = parse_body("users", body)?;
            check_role(&input.role)?;
            let password_hash = hashed(&input.password)?;
            let user = UserRepo::create(
                pool,
                &CreateUser {
                    username: input.username,
                    email: input.email,
                    password_hash,
                    first_name: input.first_name,
                    last_name: input.last_name,
                    role: input.role,
                    is_active: input.is_active,
                },
            )
            .await?;
            Ok(Some(user.id))
        }
        Some(id) => {
            let input: UpdateUserRequest = parse_body("users", body)?;
            check_role(&input.profile.role)?;
            let password_hash = input.password.as_deref().map(hashed).transpose()?;
            let Some(user) = UserRepo::update(pool, id, &input.profile).await? else {
                return Ok(None);
            };
            if let Some(hash) = password_hash {
                UserRepo::set_password(pool, user.id, &hash).await?;
            }
            Ok(Some(user.id))
        }
    }
}

fn hashed(password: &str) -> AppResult<String> {
    validate_password_strength(password).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}
