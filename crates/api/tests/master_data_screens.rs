//! Integration tests for the dashboard and the generic master-data screens.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{
    body_text, cookie_pair, get_with_cookie, location, post_form, session_cookie, set_cookies,
    token_for,
};
use rallycontrol_db::models::event::NewEvent;
use rallycontrol_db::models::race_class::NewRaceClass;
use rallycontrol_db::models::session::NewSession;
use rallycontrol_db::models::stage::NewStage;
use rallycontrol_db::repositories::{DriverRepo, EventRepo, RaceClassRepo, SessionRepo, StageRepo};
use sqlx::PgPool;

async fn admin_cookie(pool: &PgPool) -> String {
    session_cookie(&token_for(pool, "admin").await)
}

async fn seed_event(pool: &PgPool, name: &str) -> i64 {
    let input = NewEvent {
        name: name.to_string(),
        location: Some("Wachenroth".into()),
        start_date: NaiveDate::from_ymd_opt(2025, 5, 17).unwrap(),
        end_date: None,
        timezone: "Europe/Berlin".into(),
        notes: None,
    };
    EventRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_shows_live_counts(pool: PgPool) {
    let cookie = admin_cookie(&pool).await;
    seed_event(&pool, "Frühjahrsslalom").await;
    seed_event(&pool, "Herbstsprint").await;

    let app = common::build_test_app(pool);
    let response = get_with_cookie(app, "/", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<title>RallyControl Dashboard"));
    assert!(html.contains(r#"<span class="stat-label">Events</span>"#));
    assert!(html.contains(r#"<span class="stat-value">2</span>"#));
}

// ---------------------------------------------------------------------------
// Create / update flow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_redirects_with_one_time_flash(pool: PgPool) {
    let session = admin_cookie(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        "/classes/new/",
        &[("name", "GT"), ("is_active", "on")],
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/classes/");
    let flash = cookie_pair(&response, "rc_flash").expect("flash cookie set");

    let classes = RaceClassRepo::list(&pool).await.unwrap();
    assert_eq!(classes.len(), 1);
    assert!(classes[0].is_active);

    let app = common::build_test_app(pool.clone());
    let cookie = format!("{session}; {flash}");
    let response = get_with_cookie(app, "/classes/", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("rc_flash=;") && c.contains("Max-Age=0")));
    let html = body_text(response).await;
    assert!(html.contains("GT gespeichert."));
    assert!(html.contains("<td>GT</td>"));
    assert!(html.contains("<td>Ja</td>"));

    // Without the consumed cookie the message is gone.
    let app = common::build_test_app(pool);
    let html = body_text(get_with_cookie(app, "/classes/", &session).await).await;
    assert!(!html.contains("gespeichert."));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_submission_rerenders_with_errors(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/drivers/new/",
        &[("first_name", "Walter"), ("default_start_number", "elf")],
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains("Enter a whole number."));
    assert!(html.contains(r#"value="Walter""#));
    assert!(DriverRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_write_rerenders_with_409(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let input = NewRaceClass {
        name: "Historic".into(),
        description: None,
        is_active: true,
    };
    RaceClassRepo::create(&pool, &input).await.unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_form(app, "/classes/new/", &[("name", "Historic")], Some(&session)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response).await.contains("widerspricht einem bestehenden Datensatz"));
    assert_eq!(RaceClassRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_session_name_in_stage_rerenders_with_409(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let event_id = seed_event(&pool, "Frühjahrsslalom").await;
    let stage = StageRepo::create(
        &pool,
        &NewStage {
            event_id,
            name: "WP 1".into(),
            stage_order: 1,
            mode: "race".into(),
            distance_m: None,
            is_active: true,
        },
    )
    .await
    .unwrap();
    SessionRepo::create(
        &pool,
        &NewSession {
            stage_id: stage.id,
            name: "Lauf 1".into(),
            session_type: "timed_run".into(),
            status: "planned".into(),
            start_time: None,
            end_time: None,
        },
    )
    .await
    .unwrap();

    let stage_id = stage.id.to_string();
    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        "/sessions/new/",
        &[
            ("stage", stage_id.as_str()),
            ("name", "Lauf 1"),
            ("session_type", "timed_run"),
            ("status", "planned"),
        ],
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let html = body_text(response).await;
    assert!(html.contains("widerspricht einem bestehenden Datensatz"));
    assert!(html.contains(r#"value="Lauf 1""#));
    assert_eq!(SessionRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn undeclared_fields_are_ignored(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/drivers/new/",
        &[
            ("first_name", "Michèle"),
            ("last_name", "Mouton"),
            ("id", "9999"),
            ("created_at", "1999-01-01T00:00:00Z"),
        ],
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let drivers = DriverRepo::list(&pool).await.unwrap();
    assert_eq!(drivers.len(), 1);
    assert_ne!(drivers[0].id, 9999);
    assert_ne!(drivers[0].created_at.date_naive().to_string(), "1999-01-01");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_prefills_and_updates(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let event_id = seed_event(&pool, "Frühjahrsslalom").await;
    let stage = StageRepo::create(
        &pool,
        &NewStage {
            event_id,
            name: "WP 1".into(),
            stage_order: 1,
            mode: "training".into(),
            distance_m: Some(1250.5),
            is_active: true,
        },
    )
    .await
    .unwrap();
    let url = format!("/stages/{}/edit/", stage.id);

    let app = common::build_test_app(pool.clone());
    let response = get_with_cookie(app, &url, &session).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<title>Stage bearbeiten"));
    assert!(html.contains(r#"value="1250.50""#));
    assert!(html.contains(r#"<option value="training" selected>"#));

    let event = event_id.to_string();
    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        &url,
        &[
            ("event", event.as_str()),
            ("name", "WP 1"),
            ("stage_order", "2"),
            ("mode", "race"),
        ],
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/stages/");

    let updated = StageRepo::find_by_id(&pool, stage.id).await.unwrap().unwrap();
    assert_eq!(updated.stage_order, 2);
    assert_eq!(updated.mode, "race");
    assert!(!updated.is_active);
    assert_eq!(updated.distance_m, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_id_is_404_without_side_effects(pool: PgPool) {
    let session = admin_cookie(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = get_with_cookie(app, "/classes/4711/edit/", &session).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = post_form(app, "/classes/4711/edit/", &[("name", "GT")], Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(RaceClassRepo::list(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Lists and roles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_uses_declared_columns_and_labels(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let event_id = seed_event(&pool, "Frühjahrsslalom").await;
    StageRepo::create(
        &pool,
        &NewStage {
            event_id,
            name: "WP 2".into(),
            stage_order: 2,
            mode: "qualifying".into(),
            distance_m: None,
            is_active: true,
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let html = body_text(get_with_cookie(app, "/stages/", &session).await).await;

    for header in ["Event", "Name", "Stage Order", "Mode", "Aktiv"] {
        assert!(html.contains(&format!("<th>{header}</th>")), "missing {header}");
    }
    assert!(html.contains("<td>Frühjahrsslalom</td>"));
    assert!(html.contains("<td>Qualifying</td>"));
    assert!(html.contains(r#"href="/stages/new/""#));
    assert!(html.contains("/edit/"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_list_renders_placeholder_row(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let app = common::build_test_app(pool);

    let html = body_text(get_with_cookie(app, "/gates/", &session).await).await;
    assert!(html.contains("Keine Einträge vorhanden."));
    assert!(html.contains(r#"colspan="7""#));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_reads_but_cannot_write(pool: PgPool) {
    let session = session_cookie(&token_for(&pool, "viewer").await);

    let app = common::build_test_app(pool.clone());
    let response = get_with_cookie(app, "/vehicles/", &session).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains("Fahrzeug anlegen"));

    let app = common::build_test_app(pool.clone());
    let response = get_with_cookie(app, "/vehicles/new/", &session).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = post_form(app, "/classes/new/", &[("name", "GT")], Some(&session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(RaceClassRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_key_select_lists_choices(pool: PgPool) {
    let session = admin_cookie(&pool).await;
    let input = NewRaceClass {
        name: "Gruppe H".into(),
        description: None,
        is_active: true,
    };
    let class = RaceClassRepo::create(&pool, &input).await.unwrap();

    let app = common::build_test_app(pool);
    let html = body_text(get_with_cookie(app, "/drivers/new/", &session).await).await;
    assert!(html.contains(r#"<option value="" selected>---------</option>"#));
    assert!(html.contains(&format!(r#"<option value="{}">Gruppe H</option>"#, class.id)));
}
