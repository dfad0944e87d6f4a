//! Integration tests for the administrative console API.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete_auth, get, get_auth, send_json_auth, token_for};
use rallycontrol_api::auth::password::verify_password;
use rallycontrol_db::models::driver::NewDriver;
use rallycontrol_db::models::race_class::NewRaceClass;
use rallycontrol_db::repositories::{DriverRepo, RaceClassRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

async fn seed_class(pool: &PgPool, name: &str, is_active: bool) -> i64 {
    let input = NewRaceClass {
        name: name.to_string(),
        description: None,
        is_active,
    };
    RaceClassRepo::create(pool, &input).await.unwrap().id
}

async fn seed_driver(pool: &PgPool, first: &str, last: &str, class_id: Option<i64>) -> i64 {
    let input = NewDriver {
        first_name: first.to_string(),
        last_name: last.to_string(),
        display_name: None,
        team: None,
        race_class_id: class_id,
        default_start_number: None,
        transponder_id: None,
        is_active: true,
        notes: None,
    };
    DriverRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn specs_describe_every_entity(pool: PgPool) {
    let token = token_for(&pool, "viewer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/console", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let specs = json["data"].as_array().unwrap();
    assert_eq!(specs.len(), 13);
    assert_eq!(specs[0]["slug"], "users");

    let stages = specs.iter().find(|s| s["slug"] == "stages").unwrap();
    let mode = stages["filters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "mode")
        .unwrap();
    assert_eq!(mode["kind"]["type"], "choice");
    assert!(stages.get("table").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn console_requires_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/console/drivers").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_filter_and_paging(pool: PgPool) {
    let token = token_for(&pool, "viewer").await;
    let gt = seed_class(&pool, "GT", true).await;
    seed_driver(&pool, "Walter", "Röhrl", Some(gt)).await;
    seed_driver(&pool, "Michèle", "Mouton", Some(gt)).await;
    seed_driver(&pool, "Hannu", "Mikkola", None).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/console/drivers?q=m", &token).await).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["limit"], 100);
    // Ordered by last name.
    assert_eq!(json["data"]["rows"][0]["last_name"], "Mikkola");
    assert_eq!(json["data"]["rows"][1]["display"], "Michèle Mouton");

    let uri = format!("/api/v1/console/drivers?race_class={gt}&limit=1&offset=1");
    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["total"], 2);
    let rows = json["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["last_name"], "Röhrl");
    assert_eq!(rows[0]["race_class"], "GT");

    // Blank filter values are ignored.
    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/console/drivers?race_class=", &token).await).await;
    assert_eq!(json["data"]["total"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_treats_wildcards_literally(pool: PgPool) {
    let token = token_for(&pool, "viewer").await;
    seed_class(&pool, "100% Elektro", true).await;
    seed_class(&pool, "1000 ccm", true).await;

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/console/classes?q=100%25", &token).await).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["rows"][0]["name"], "100% Elektro");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_query_parameters_are_rejected(pool: PgPool) {
    let token = token_for(&pool, "viewer").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/console/drivers?colour=red", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("race_class, is_active"));

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/console/stages?mode=rally", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/console/classes?is_active=maybe", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/console/classes?limit=-5", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_entity_is_404(pool: PgPool) {
    let token = token_for(&pool, "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/console/teams", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let app = common::build_test_app(pool);
    let response = send_json_auth(app, Method::POST, "/api/v1/console/teams", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_rows_never_expose_password_hashes(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let admin = UserRepo::find_by_username(&pool, "admin-user").await.unwrap().unwrap();

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/console/users/{}", admin.id);
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["username"], "admin-user");
    assert!(json["data"].get("password_hash").is_none());

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/console/users", &token).await).await;
    let row = &json["data"]["rows"][0];
    assert_eq!(row["role"], "admin");
    assert!(row.get("password_hash").is_none());
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_create_update_delete(pool: PgPool) {
    let token = token_for(&pool, "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = send_json_auth(
        app,
        Method::POST,
        "/api/v1/console/events",
        json!({ "name": "Bergslalom", "start_date": "2025-06-07" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["timezone"], "Europe/Berlin");
    let uri = format!("/api/v1/console/events/{id}");

    let app = common::build_test_app(pool.clone());
    let response = send_json_auth(
        app,
        Method::PUT,
        &uri,
        json!({
            "name": "Bergslalom",
            "location": "Osnabrück",
            "start_date": "2025-06-07",
            "end_date": "2025-06-08",
            "timezone": "Europe/Berlin",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["location"], "Osnabrück");
    assert_eq!(updated["data"]["end_date"], "2025-06-08");

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_row_is_404(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let app = common::build_test_app(pool);

    let response = send_json_auth(
        app,
        Method::PUT,
        "/api/v1/console/classes/4711",
        json!({ "name": "GT" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Klasse with id 4711 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn writes_require_admin(pool: PgPool) {
    let token = token_for(&pool, "operator").await;
    let class_id = seed_class(&pool, "GT", true).await;

    let app = common::build_test_app(pool.clone());
    let response = send_json_auth(
        app,
        Method::POST,
        "/api/v1/console/classes",
        json!({ "name": "Historic" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/console/classes/{class_id}");
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(RaceClassRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_payloads_are_rejected(pool: PgPool) {
    let token = token_for(&pool, "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = send_json_auth(
        app,
        Method::POST,
        "/api/v1/console/gates",
        json!({ "gate_uid": "G-01", "name": "Start", "gate_type": "pitlane" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool.clone());
    let response = send_json_auth(
        app,
        Method::POST,
        "/api/v1/console/classes",
        json!({ "description": "no name" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let app = common::build_test_app(pool);
    let response = send_json_auth(
        app,
        Method::POST,
        "/api/v1/console/users",
        json!({ "username": "zeit", "password": "kurz", "role": "operator" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_gate_uid_is_409(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let gate = json!({ "gate_uid": "G-01", "name": "Start" });

    let app = common::build_test_app(pool.clone());
    let response =
        send_json_auth(app, Method::POST, "/api/v1/console/gates", gate.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = send_json_auth(app, Method::POST, "/api/v1/console/gates", gate, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONSTRAINT_VIOLATION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_are_created_with_hashed_passwords(pool: PgPool) {
    let token = token_for(&pool, "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = send_json_auth(
        app,
        Method::POST,
        "/api/v1/console/users",
        json!({ "username": "zeitnahme", "password": "startflagge-2025" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "operator");
    assert_eq!(json["data"]["is_active"], true);
    let id = json["data"]["id"].as_i64().unwrap();

    let user = UserRepo::find_by_username(&pool, "zeitnahme").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "startflagge-2025");
    assert!(verify_password("startflagge-2025", &user.password_hash).unwrap());

    let app = common::build_test_app(pool.clone());
    let response = send_json_auth(
        app,
        Method::PUT,
        &format!("/api/v1/console/users/{id}"),
        json!({
            "username": "zeitnahme",
            "role": "viewer",
            "is_active": false,
            "password": "zielflagge-2026",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = UserRepo::find_by_username(&pool, "zeitnahme").await.unwrap().unwrap();
    assert_eq!(user.role, "viewer");
    assert!(!user.is_active);
    assert!(verify_password("zielflagge-2026", &user.password_hash).unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_role_is_rejected(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let app = common::build_test_app(pool);

    let response = send_json_auth(
        app,
        Method::POST,
        "/api/v1/console/users",
        json!({ "username": "root", "password": "startflagge-2025", "role": "superuser" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_class_detaches_its_drivers(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let class_id = seed_class(&pool, "GT", false).await;
    let driver_id = seed_driver(&pool, "Walter", "Röhrl", Some(class_id)).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/console/classes/{class_id}");
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let driver = DriverRepo::find_by_id(&pool, driver_id).await.unwrap().unwrap();
    assert_eq!(driver.race_class_id, None);
}
