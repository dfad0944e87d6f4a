//! Integration tests for entity CRUD operations.
//!
//! Exercises the full repository layer against a real database:
//! - Create the full hierarchy (event -> stage -> session -> run -> passage -> capture -> OCR)
//! - Cascade and set-null delete behaviour
//! - Unique constraint violations
//! - Default ordering and joined labels

use assert_matches::assert_matches;
use chrono::{NaiveDate, TimeZone, Utc};
use rallycontrol_db::error::{constraint_violation, ConstraintKind};
use rallycontrol_db::models::capture::NewCapture;
use rallycontrol_db::models::driver::NewDriver;
use rallycontrol_db::models::event::{NewEvent, DEFAULT_TIMEZONE};
use rallycontrol_db::models::gate::NewGate;
use rallycontrol_db::models::leaderboard::NewLeaderboard;
use rallycontrol_db::models::ocr_result::NewOcrResult;
use rallycontrol_db::models::passage::{NewPassage, PassageFilter};
use rallycontrol_db::models::race_class::NewRaceClass;
use rallycontrol_db::models::run::{NewRun, RunFilter};
use rallycontrol_db::models::session::NewSession;
use rallycontrol_db::models::stage::NewStage;
use rallycontrol_db::models::user::CreateUser;
use rallycontrol_db::models::vehicle::NewVehicle;
use rallycontrol_db::repositories::{
    CaptureRepo, DashboardRepo, DriverRepo, EventRepo, GateRepo, LeaderboardRepo, OcrResultRepo,
    PassageRepo, RaceClassRepo, RunRepo, SessionRepo, StageRepo, UserRepo, VehicleRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_class(name: &str) -> NewRaceClass {
    NewRaceClass {
        name: name.to_string(),
        description: None,
        is_active: true,
    }
}

fn new_driver(first: &str, last: &str, race_class_id: Option<i64>) -> NewDriver {
    NewDriver {
        first_name: first.to_string(),
        last_name: last.to_string(),
        display_name: None,
        team: None,
        race_class_id,
        default_start_number: None,
        transponder_id: None,
        is_active: true,
        notes: None,
    }
}

fn new_event(name: &str, start: NaiveDate) -> NewEvent {
    NewEvent {
        name: name.to_string(),
        location: None,
        start_date: start,
        end_date: None,
        timezone: DEFAULT_TIMEZONE.to_string(),
        notes: None,
    }
}

fn new_stage(event_id: i64, name: &str, order: i32) -> NewStage {
    NewStage {
        event_id,
        name: name.to_string(),
        stage_order: order,
        mode: "training".to_string(),
        distance_m: None,
        is_active: true,
    }
}

fn new_session(stage_id: i64, name: &str) -> NewSession {
    NewSession {
        stage_id,
        name: name.to_string(),
        session_type: "timed_run".to_string(),
        status: "planned".to_string(),
        start_time: None,
        end_time: None,
    }
}

fn new_gate(uid: &str, stage_id: Option<i64>) -> NewGate {
    NewGate {
        gate_uid: uid.to_string(),
        name: format!("Gate {uid}"),
        gate_type: "start".to_string(),
        stage_id,
        ip_address: None,
        location_hint: None,
        is_enabled: true,
        last_seen_at: None,
        fw_version: None,
        notes: None,
    }
}

fn new_vehicle(driver_id: i64, name: &str, race_class_id: Option<i64>) -> NewVehicle {
    NewVehicle {
        driver_id,
        race_class_id,
        name: name.to_string(),
        default_start_number: None,
        notes: None,
        is_active: true,
    }
}

fn new_run(session_id: i64, driver_id: i64, vehicle_id: Option<i64>) -> NewRun {
    NewRun {
        session_id,
        driver_id,
        vehicle_id,
        status: "queued".to_string(),
        started_at: None,
        finished_at: None,
        total_time_ms: None,
        penalty_ms: 0,
        final_time_ms: None,
        start_number_used: None,
        start_number_source: "driver_default".to_string(),
        comment: None,
    }
}

fn new_passage(session_id: i64, gate_id: i64, run_id: Option<i64>, ts: i64) -> NewPassage {
    NewPassage {
        run_id,
        session_id,
        gate_id,
        timestamp_ms: ts,
        received_at: None,
        direction: None,
        signal_quality: None,
        raw_payload: None,
        is_valid: true,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

// ---------------------------------------------------------------------------
// Test: Full hierarchy creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_full_hierarchy(pool: PgPool) {
    let class = RaceClassRepo::create(&pool, &new_class("GT3")).await.unwrap();
    assert!(class.is_active);

    let driver = DriverRepo::create(&pool, &new_driver("Walter", "Röhrl", Some(class.id)))
        .await
        .unwrap();
    assert_eq!(driver.to_string(), "Walter Röhrl");

    let event = EventRepo::create(&pool, &new_event("Hillclimb", date(2025, 5, 17)))
        .await
        .unwrap();
    assert_eq!(event.timezone, "Europe/Berlin");
    assert_eq!(event.to_string(), "Hillclimb (2025-05-17)");

    let mut stage_input = new_stage(event.id, "Run 1", 1);
    stage_input.distance_m = Some(1234.5);
    let stage = StageRepo::create(&pool, &stage_input).await.unwrap();
    assert_eq!(stage.distance_m, Some(1234.5));

    let session = SessionRepo::create(&pool, &new_session(stage.id, "Heat A"))
        .await
        .unwrap();
    let gate = GateRepo::create(&pool, &new_gate("G-START", Some(stage.id)))
        .await
        .unwrap();
    let vehicle = VehicleRepo::create(&pool, &new_vehicle(driver.id, "Quattro", None))
        .await
        .unwrap();

    let run = RunRepo::create(&pool, &new_run(session.id, driver.id, Some(vehicle.id)))
        .await
        .unwrap();
    assert_eq!(run.status, "queued");
    assert_eq!(run.penalty_ms, 0);

    let passage = PassageRepo::create(&pool, &new_passage(session.id, gate.id, Some(run.id), 1000))
        .await
        .unwrap();
    assert!(passage.is_valid);

    let capture = CaptureRepo::create(
        &pool,
        &NewCapture {
            passage_id: passage.id,
            image_path: "/captures/1.jpg".into(),
            captured_at_ms: Some(1001),
            width: Some(1920),
            height: Some(1080),
            sha256: Some("ab".repeat(32)),
        },
    )
    .await
    .unwrap();

    let ocr = OcrResultRepo::create(
        &pool,
        &NewOcrResult {
            capture_id: capture.id,
            detected_number: Some(42),
            confidence: 0.93,
            engine: "tesseract".into(),
            processing_ms: Some(120),
            status: "ok".into(),
            raw_text: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(ocr.to_string(), "OCR 42 (tesseract)");

    let stage_item = StageRepo::find_with_labels(&pool, stage.id).await.unwrap().unwrap();
    assert_eq!(stage_item.to_string(), "Hillclimb - Run 1");
    let session_item = SessionRepo::find_with_labels(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session_item.to_string(), "Hillclimb - Run 1 – Heat A");
    let vehicle_item = VehicleRepo::find_with_labels(&pool, vehicle.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vehicle_item.to_string(), "Walter Röhrl – Quattro");
    let gate_item = GateRepo::find_with_labels(&pool, gate.id).await.unwrap().unwrap();
    assert_eq!(gate_item.to_string(), "Gate G-START (G-START)");
    assert_eq!(gate_item.stage_label(), "Hillclimb - Run 1");
}

// ---------------------------------------------------------------------------
// Test: Cascade delete event removes everything recorded under it
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cascade_delete_event(pool: PgPool) {
    let driver = DriverRepo::create(&pool, &new_driver("Michèle", "Mouton", None))
        .await
        .unwrap();
    let event = EventRepo::create(&pool, &new_event("Cascade", date(2025, 6, 1)))
        .await
        .unwrap();
    let stage = StageRepo::create(&pool, &new_stage(event.id, "S1", 1))
        .await
        .unwrap();
    let session = SessionRepo::create(&pool, &new_session(stage.id, "H1"))
        .await
        .unwrap();
    let gate = GateRepo::create(&pool, &new_gate("G1", Some(stage.id)))
        .await
        .unwrap();
    let run = RunRepo::create(&pool, &new_run(session.id, driver.id, None))
        .await
        .unwrap();
    let passage = PassageRepo::create(&pool, &new_passage(session.id, gate.id, Some(run.id), 5))
        .await
        .unwrap();
    let capture = CaptureRepo::create(
        &pool,
        &NewCapture {
            passage_id: passage.id,
            image_path: "/c.jpg".into(),
            captured_at_ms: None,
            width: None,
            height: None,
            sha256: None,
        },
    )
    .await
    .unwrap();
    OcrResultRepo::create(
        &pool,
        &NewOcrResult {
            capture_id: capture.id,
            detected_number: None,
            confidence: 0.1,
            engine: "e".into(),
            processing_ms: None,
            status: "failed".into(),
            raw_text: None,
        },
    )
    .await
    .unwrap();
    LeaderboardRepo::create(
        &pool,
        &NewLeaderboard {
            session_id: session.id,
            race_class_id: None,
            generated_at: None,
            data_json: serde_json::json!({"rows": []}),
            checksum: None,
        },
    )
    .await
    .unwrap();

    assert!(EventRepo::delete(&pool, event.id).await.unwrap());

    for table in [
        "stages",
        "sessions",
        "runs",
        "passages",
        "captures",
        "ocr_results",
        "leaderboards",
    ] {
        assert_eq!(count(&pool, table).await, 0, "{table} should be empty");
    }

    // The gate survives with its stage cleared; the driver is untouched.
    let gate = GateRepo::find_by_id(&pool, gate.id).await.unwrap().unwrap();
    assert_eq!(gate.stage_id, None);
    assert!(DriverRepo::find_by_id(&pool, driver.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_class_clears_references(pool: PgPool) {
    let class = RaceClassRepo::create(&pool, &new_class("Historic")).await.unwrap();
    let driver = DriverRepo::create(&pool, &new_driver("Hannu", "Mikkola", Some(class.id)))
        .await
        .unwrap();
    let vehicle = VehicleRepo::create(&pool, &new_vehicle(driver.id, "A2", Some(class.id)))
        .await
        .unwrap();

    assert!(RaceClassRepo::delete(&pool, class.id).await.unwrap());

    let driver = DriverRepo::find_by_id(&pool, driver.id).await.unwrap().unwrap();
    assert_eq!(driver.race_class_id, None);
    let vehicle = VehicleRepo::find_by_id(&pool, vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle.race_class_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_driver_cascades_vehicles_and_runs(pool: PgPool) {
    let driver = DriverRepo::create(&pool, &new_driver("Ari", "Vatanen", None))
        .await
        .unwrap();
    let vehicle = VehicleRepo::create(&pool, &new_vehicle(driver.id, "205 T16", None))
        .await
        .unwrap();
    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    let stage = StageRepo::create(&pool, &new_stage(event.id, "S", 1)).await.unwrap();
    let session = SessionRepo::create(&pool, &new_session(stage.id, "H")).await.unwrap();
    RunRepo::create(&pool, &new_run(session.id, driver.id, Some(vehicle.id)))
        .await
        .unwrap();

    assert!(DriverRepo::delete(&pool, driver.id).await.unwrap());
    assert_eq!(count(&pool, "vehicles").await, 0);
    assert_eq!(count(&pool, "runs").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_run_keeps_passages(pool: PgPool) {
    let driver = DriverRepo::create(&pool, &new_driver("Juha", "Kankkunen", None))
        .await
        .unwrap();
    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    let stage = StageRepo::create(&pool, &new_stage(event.id, "S", 1)).await.unwrap();
    let session = SessionRepo::create(&pool, &new_session(stage.id, "H")).await.unwrap();
    let gate = GateRepo::create(&pool, &new_gate("G", None)).await.unwrap();
    let run = RunRepo::create(&pool, &new_run(session.id, driver.id, None))
        .await
        .unwrap();
    let passage = PassageRepo::create(&pool, &new_passage(session.id, gate.id, Some(run.id), 9))
        .await
        .unwrap();

    assert!(RunRepo::delete(&pool, run.id).await.unwrap());
    let passage = PassageRepo::find_by_id(&pool, passage.id).await.unwrap().unwrap();
    assert_eq!(passage.run_id, None);
}

// ---------------------------------------------------------------------------
// Test: Unique constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_class_name(pool: PgPool) {
    RaceClassRepo::create(&pool, &new_class("GT3")).await.unwrap();
    let err = RaceClassRepo::create(&pool, &new_class("GT3")).await.unwrap_err();

    let violation = constraint_violation(&err).expect("should be a constraint violation");
    assert_eq!(violation.kind, ConstraintKind::Unique);
    assert_eq!(violation.constraint, "uq_classes_name");
    assert_eq!(RaceClassRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stage_name_unique_per_event(pool: PgPool) {
    let a = EventRepo::create(&pool, &new_event("A", date(2025, 1, 1))).await.unwrap();
    let b = EventRepo::create(&pool, &new_event("B", date(2025, 1, 2))).await.unwrap();

    StageRepo::create(&pool, &new_stage(a.id, "SS1", 1)).await.unwrap();
    // Same name under another event is fine.
    StageRepo::create(&pool, &new_stage(b.id, "SS1", 1)).await.unwrap();

    let err = StageRepo::create(&pool, &new_stage(a.id, "SS1", 2))
        .await
        .unwrap_err();
    assert_matches!(
        constraint_violation(&err),
        Some(v) if v.constraint == "uq_stages_event_name"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_gate_uid_on_update(pool: PgPool) {
    GateRepo::create(&pool, &new_gate("G-1", None)).await.unwrap();
    let other = GateRepo::create(&pool, &new_gate("G-2", None)).await.unwrap();

    let err = GateRepo::update(&pool, other.id, &new_gate("G-1", None))
        .await
        .unwrap_err();
    assert_matches!(
        constraint_violation(&err),
        Some(v) if v.constraint == "uq_gates_gate_uid"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_name_unique_per_stage(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    let ss1 = StageRepo::create(&pool, &new_stage(event.id, "SS1", 1)).await.unwrap();
    let ss2 = StageRepo::create(&pool, &new_stage(event.id, "SS2", 2)).await.unwrap();

    SessionRepo::create(&pool, &new_session(ss1.id, "Lauf 1")).await.unwrap();
    SessionRepo::create(&pool, &new_session(ss2.id, "Lauf 1")).await.unwrap();

    let err = SessionRepo::create(&pool, &new_session(ss1.id, "Lauf 1"))
        .await
        .unwrap_err();
    let violation = constraint_violation(&err).expect("should be a constraint violation");
    assert_eq!(violation.kind, ConstraintKind::Unique);
    assert_eq!(violation.constraint, "uq_sessions_stage_name");
    assert_eq!(count(&pool, "sessions").await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_capture_sha256_unique_when_present(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    let stage = StageRepo::create(&pool, &new_stage(event.id, "SS1", 1)).await.unwrap();
    let session = SessionRepo::create(&pool, &new_session(stage.id, "Lauf 1")).await.unwrap();
    let gate = GateRepo::create(&pool, &new_gate("G-1", Some(stage.id))).await.unwrap();
    let passage = PassageRepo::create(&pool, &new_passage(session.id, gate.id, None, 1_000))
        .await
        .unwrap();

    let capture = |sha256: Option<&str>| NewCapture {
        passage_id: passage.id,
        image_path: "captures/frame.jpg".to_string(),
        captured_at_ms: None,
        width: None,
        height: None,
        sha256: sha256.map(str::to_string),
    };
    let digest = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    // Any number of captures may lack a digest.
    CaptureRepo::create(&pool, &capture(None)).await.unwrap();
    CaptureRepo::create(&pool, &capture(None)).await.unwrap();
    CaptureRepo::create(&pool, &capture(Some(digest))).await.unwrap();

    let err = CaptureRepo::create(&pool, &capture(Some(digest))).await.unwrap_err();
    assert_matches!(
        constraint_violation(&err),
        Some(v) if v.kind == ConstraintKind::Unique && v.constraint == "uq_captures_sha256"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_username_and_email_unique(pool: PgPool) {
    let user = |username: &str, email: Option<&str>| CreateUser {
        username: username.to_string(),
        email: email.map(str::to_string),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        first_name: String::new(),
        last_name: String::new(),
        role: "operator".to_string(),
        is_active: true,
    };

    UserRepo::create(&pool, &user("zeitnahme", Some("zeit@example.org"))).await.unwrap();
    // Users without an email do not collide.
    UserRepo::create(&pool, &user("helfer1", None)).await.unwrap();
    UserRepo::create(&pool, &user("helfer2", None)).await.unwrap();

    let err = UserRepo::create(&pool, &user("zeitnahme", None)).await.unwrap_err();
    assert_matches!(
        constraint_violation(&err),
        Some(v) if v.kind == ConstraintKind::Unique && v.constraint == "uq_users_username"
    );

    let err = UserRepo::create(&pool, &user("leitung", Some("zeit@example.org")))
        .await
        .unwrap_err();
    assert_matches!(
        constraint_violation(&err),
        Some(v) if v.kind == ConstraintKind::Unique && v.constraint == "uq_users_email"
    );
    assert_eq!(count(&pool, "users").await, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_choice_is_check_violation(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    let mut input = new_stage(event.id, "S", 1);
    input.mode = "rallycross".into();

    let err = StageRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(
        constraint_violation(&err),
        Some(v) if v.kind == ConstraintKind::Check && v.constraint == "ck_stages_mode"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_parent_is_foreign_key_violation(pool: PgPool) {
    let err = StageRepo::create(&pool, &new_stage(9999, "Orphan", 1))
        .await
        .unwrap_err();
    assert_matches!(
        constraint_violation(&err),
        Some(v) if v.kind == ConstraintKind::ForeignKey
    );
}

// ---------------------------------------------------------------------------
// Test: Update and list operations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_fields(pool: PgPool) {
    let class = RaceClassRepo::create(&pool, &new_class("N")).await.unwrap();
    let mut input = new_driver("Sébastien", "Loeb", Some(class.id));
    let driver = DriverRepo::create(&pool, &input).await.unwrap();

    input.race_class_id = None;
    input.display_name = Some("Seb".into());
    input.is_active = false;
    let updated = DriverRepo::update(&pool, driver.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.race_class_id, None);
    assert_eq!(updated.to_string(), "Seb");
    assert!(!updated.is_active);

    assert!(DriverRepo::update(&pool, 9999, &input).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_default_ordering(pool: PgPool) {
    for name in ["Rally2", "Historic", "N"] {
        RaceClassRepo::create(&pool, &new_class(name)).await.unwrap();
    }
    let names: Vec<_> = RaceClassRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Historic", "N", "Rally2"]);

    DriverRepo::create(&pool, &new_driver("Tommi", "Makinen", None)).await.unwrap();
    DriverRepo::create(&pool, &new_driver("Colin", "McRae", None)).await.unwrap();
    DriverRepo::create(&pool, &new_driver("Alister", "McRae", None)).await.unwrap();
    let drivers: Vec<_> = DriverRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.to_string())
        .collect();
    assert_eq!(drivers, ["Tommi Makinen", "Alister McRae", "Colin McRae"]);

    let old = EventRepo::create(&pool, &new_event("Old", date(2024, 1, 1))).await.unwrap();
    let new = EventRepo::create(&pool, &new_event("New", date(2025, 1, 1))).await.unwrap();
    let events: Vec<_> = EventRepo::list(&pool).await.unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(events, [new.id, old.id]);

    StageRepo::create(&pool, &new_stage(old.id, "Old-2", 2)).await.unwrap();
    StageRepo::create(&pool, &new_stage(old.id, "Old-1", 1)).await.unwrap();
    StageRepo::create(&pool, &new_stage(new.id, "New-1", 1)).await.unwrap();
    let stages: Vec<_> = StageRepo::list_with_labels(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(stages, ["New - New-1", "Old - Old-1", "Old - Old-2"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_ordering_by_start_time(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    let stage = StageRepo::create(&pool, &new_stage(event.id, "S", 1)).await.unwrap();

    let mut late = new_session(stage.id, "Late");
    late.start_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 14, 0, 0).unwrap());
    let mut early = new_session(stage.id, "Early");
    early.start_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
    SessionRepo::create(&pool, &late).await.unwrap();
    SessionRepo::create(&pool, &early).await.unwrap();
    SessionRepo::create(&pool, &new_session(stage.id, "Unscheduled")).await.unwrap();

    let names: Vec<_> = SessionRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Early", "Late", "Unscheduled"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collaborator_listings(pool: PgPool) {
    let driver = DriverRepo::create(&pool, &new_driver("A", "B", None)).await.unwrap();
    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    let stage = StageRepo::create(&pool, &new_stage(event.id, "S", 1)).await.unwrap();
    let s1 = SessionRepo::create(&pool, &new_session(stage.id, "H1")).await.unwrap();
    let s2 = SessionRepo::create(&pool, &new_session(stage.id, "H2")).await.unwrap();
    let gate = GateRepo::create(&pool, &new_gate("G", None)).await.unwrap();

    RunRepo::create(&pool, &new_run(s1.id, driver.id, None)).await.unwrap();
    RunRepo::create(&pool, &new_run(s2.id, driver.id, None)).await.unwrap();
    let filter = RunFilter {
        session_id: Some(s2.id),
        driver_id: None,
    };
    let runs = RunRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].session_id, s2.id);
    assert_eq!(RunRepo::list(&pool, &RunFilter::default()).await.unwrap().len(), 2);

    for ts in [300, 100, 200] {
        PassageRepo::create(&pool, &new_passage(s1.id, gate.id, None, ts))
            .await
            .unwrap();
    }
    let stamps: Vec<_> = PassageRepo::list(&pool, &PassageFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.timestamp_ms)
        .collect();
    assert_eq!(stamps, [100, 200, 300]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_counts(pool: PgPool) {
    let counts = DashboardRepo::counts(&pool).await.unwrap();
    assert_eq!(counts.events, 0);

    let event = EventRepo::create(&pool, &new_event("E", date(2025, 1, 1))).await.unwrap();
    StageRepo::create(&pool, &new_stage(event.id, "S1", 1)).await.unwrap();
    StageRepo::create(&pool, &new_stage(event.id, "S2", 2)).await.unwrap();
    let driver = DriverRepo::create(&pool, &new_driver("A", "B", None)).await.unwrap();
    VehicleRepo::create(&pool, &new_vehicle(driver.id, "V", None)).await.unwrap();
    GateRepo::create(&pool, &new_gate("G", None)).await.unwrap();

    let counts = DashboardRepo::counts(&pool).await.unwrap();
    assert_eq!(
        (counts.events, counts.stages, counts.sessions),
        (1, 2, 0)
    );
    assert_eq!(
        (counts.drivers, counts.vehicles, counts.gates),
        (1, 1, 1)
    );
}
