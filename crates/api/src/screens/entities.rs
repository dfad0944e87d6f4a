//! [`MasterEntity`] strategies for the seven master-data entities.

use async_trait::async_trait;
use rallycontrol_core::choices::{GateType, SessionStatus, SessionType, StageMode};
use rallycontrol_core::forms::{FieldErrors, FormData};
use rallycontrol_core::labels::{date, datetime, number, text, yes_no};
use rallycontrol_core::types::DbId;
use rallycontrol_db::models::driver::{DriverListItem, NewDriver};
use rallycontrol_db::models::event::{Event, NewEvent};
use rallycontrol_db::models::gate::{GateListItem, NewGate};
use rallycontrol_db::models::race_class::{NewRaceClass, RaceClass};
use rallycontrol_db::models::session::{NewSession, SessionListItem};
use rallycontrol_db::models::stage::{NewStage, StageListItem};
use rallycontrol_db::models::vehicle::{NewVehicle, VehicleListItem};
use rallycontrol_db::repositories::{
    DriverRepo, EventRepo, GateRepo, RaceClassRepo, SessionRepo, StageRepo, VehicleRepo,
};
use rallycontrol_db::DbPool;

use super::{Column, EntityMeta, MasterEntity};
use crate::forms::{self, FormSpec};

/// Re-read a freshly written row with its joined labels.
fn written<T>(row: Option<T>) -> Result<T, sqlx::Error> {
    row.ok_or(sqlx::Error::RowNotFound)
}

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

pub struct RaceClassScreen;

static RACE_CLASS_COLUMNS: &[Column<RaceClass>] = &[
    Column::<RaceClass>::new("name", |c| c.name.clone()),
    Column::<RaceClass>::new("description", |c| text(c.description.as_deref())),
    Column::<RaceClass>::new("is_active", |c| yes_no(c.is_active)).labelled("Aktiv"),
];

#[async_trait]
impl MasterEntity for RaceClassScreen {
    type Record = RaceClass;
    type Input = NewRaceClass;

    const META: EntityMeta = EntityMeta {
        slug: "classes",
        model_name: "RaceClass",
        verbose_name: "Klasse",
        verbose_name_plural: "Klassen",
        list_title: Some("Klassen"),
        create_title: "Klasse anlegen",
        update_title: "Klasse bearbeiten",
        list_display: &["name", "description", "is_active"],
    };

    fn columns() -> &'static [Column<RaceClass>] {
        RACE_CLASS_COLUMNS
    }

    fn form() -> &'static FormSpec {
        &forms::race_class::FORM
    }

    fn id(record: &RaceClass) -> DbId {
        record.id
    }

    fn validate(data: &FormData) -> Result<NewRaceClass, FieldErrors> {
        forms::race_class::validate(data)
    }

    fn initial(record: &RaceClass) -> FormData {
        forms::race_class::initial(record)
    }

    fn defaults() -> FormData {
        forms::race_class::defaults()
    }

    async fn list(pool: &DbPool) -> Result<Vec<RaceClass>, sqlx::Error> {
        RaceClassRepo::list(pool).await
    }

    async fn find(pool: &DbPool, id: DbId) -> Result<Option<RaceClass>, sqlx::Error> {
        RaceClassRepo::find_by_id(pool, id).await
    }

    async fn insert(pool: &DbPool, input: &NewRaceClass) -> Result<RaceClass, sqlx::Error> {
        RaceClassRepo::create(pool, input).await
    }

    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &NewRaceClass,
    ) -> Result<Option<RaceClass>, sqlx::Error> {
        RaceClassRepo::update(pool, id, input).await
    }
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

pub struct DriverScreen;

static DRIVER_COLUMNS: &[Column<DriverListItem>] = &[
    Column::<DriverListItem>::new("display_name", |d| text(d.driver.display_name.as_deref())),
    Column::<DriverListItem>::new("first_name", |d| d.driver.first_name.clone()),
    Column::<DriverListItem>::new("last_name", |d| d.driver.last_name.clone()),
    Column::<DriverListItem>::new("team", |d| text(d.driver.team.as_deref())),
    Column::<DriverListItem>::new("race_class", |d| text(d.race_class_name.as_deref()))
        .labelled("Klasse"),
    Column::<DriverListItem>::new("default_start_number", |d| {
        number(d.driver.default_start_number)
    }),
    Column::<DriverListItem>::new("transponder_id", |d| text(d.driver.transponder_id.as_deref())),
    Column::<DriverListItem>::new("is_active", |d| yes_no(d.driver.is_active)).labelled("Aktiv"),
];

#[async_trait]
impl MasterEntity for DriverScreen {
    type Record = DriverListItem;
    type Input = NewDriver;

    const META: EntityMeta = EntityMeta {
        slug: "drivers",
        model_name: "Driver",
        verbose_name: "Fahrer",
        verbose_name_plural: "Fahrer",
        list_title: Some("Fahrer"),
        create_title: "Fahrer anlegen",
        update_title: "Fahrer bearbeiten",
        list_display: &["display_name", "first_name", "last_name", "team", "race_class"],
    };

    fn columns() -> &'static [Column<DriverListItem>] {
        DRIVER_COLUMNS
    }

    fn form() -> &'static FormSpec {
        &forms::driver::FORM
    }

    fn id(record: &DriverListItem) -> DbId {
        record.driver.id
    }

    fn validate(data: &FormData) -> Result<NewDriver, FieldErrors> {
        forms::driver::validate(data)
    }

    fn initial(record: &DriverListItem) -> FormData {
        forms::driver::initial(&record.driver)
    }

    fn defaults() -> FormData {
        forms::driver::defaults()
    }

    async fn list(pool: &DbPool) -> Result<Vec<DriverListItem>, sqlx::Error> {
        DriverRepo::list_with_labels(pool).await
    }

    async fn find(pool: &DbPool, id: DbId) -> Result<Option<DriverListItem>, sqlx::Error> {
        DriverRepo::find_with_labels(pool, id).await
    }

    async fn insert(pool: &DbPool, input: &NewDriver) -> Result<DriverListItem, sqlx::Error> {
        let driver = DriverRepo::create(pool, input).await?;
        written(DriverRepo::find_with_labels(pool, driver.id).await?)
    }

    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &NewDriver,
    ) -> Result<Option<DriverListItem>, sqlx::Error> {
        match DriverRepo::update(pool, id, input).await? {
            Some(_) => DriverRepo::find_with_labels(pool, id).await,
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

pub struct EventScreen;

static EVENT_COLUMNS: &[Column<Event>] = &[
    Column::<Event>::new("name", |e| e.name.clone()),
    Column::<Event>::new("location", |e| text(e.location.as_deref())),
    Column::<Event>::new("start_date", |e| date(Some(e.start_date))),
    Column::<Event>::new("end_date", |e| date(e.end_date)),
    Column::<Event>::new("timezone", |e| e.timezone.clone()),
];

#[async_trait]
impl MasterEntity for EventScreen {
    type Record = Event;
    type Input = NewEvent;

    const META: EntityMeta = EntityMeta {
        slug: "events",
        model_name: "Event",
        verbose_name: "Event",
        verbose_name_plural: "Events",
        list_title: Some("Events"),
        create_title: "Event anlegen",
        update_title: "Event bearbeiten",
        list_display: &["name", "location", "start_date", "end_date"],
    };

    fn columns() -> &'static [Column<Event>] {
        EVENT_COLUMNS
    }

    fn form() -> &'static FormSpec {
        &forms::event::FORM
    }

    fn id(record: &Event) -> DbId {
        record.id
    }

    fn validate(data: &FormData) -> Result<NewEvent, FieldErrors> {
        forms::event::validate(data)
    }

    fn initial(record: &Event) -> FormData {
        forms::event::initial(record)
    }

    fn defaults() -> FormData {
        forms::event::defaults()
    }

    async fn list(pool: &DbPool) -> Result<Vec<Event>, sqlx::Error> {
        EventRepo::list(pool).await
    }

    async fn find(pool: &DbPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        EventRepo::find_by_id(pool, id).await
    }

    async fn insert(pool: &DbPool, input: &NewEvent) -> Result<Event, sqlx::Error> {
        EventRepo::create(pool, input).await
    }

    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &NewEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        EventRepo::update(pool, id, input).await
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

pub struct StageScreen;

static STAGE_COLUMNS: &[Column<StageListItem>] = &[
    Column::<StageListItem>::new("event", |s| s.event_name.clone()),
    Column::<StageListItem>::new("name", |s| s.stage.name.clone()),
    Column::<StageListItem>::new("stage_order", |s| s.stage.stage_order.to_string()),
    Column::<StageListItem>::new("mode", |s| StageMode::label_for(&s.stage.mode)),
    Column::<StageListItem>::new("distance_m", |s| {
        s.stage.distance_m.map(|d| format!("{d:.2}")).unwrap_or_default()
    })
    .labelled("Distance (m)"),
    Column::<StageListItem>::new("is_active", |s| yes_no(s.stage.is_active)).labelled("Aktiv"),
];

#[async_trait]
impl MasterEntity for StageScreen {
    type Record = StageListItem;
    type Input = NewStage;

    const META: EntityMeta = EntityMeta {
        slug: "stages",
        model_name: "Stage",
        verbose_name: "Stage",
        verbose_name_plural: "Stages",
        list_title: Some("Stages"),
        create_title: "Stage anlegen",
        update_title: "Stage bearbeiten",
        list_display: &["event", "name", "stage_order", "mode", "is_active"],
    };

    fn columns() -> &'static [Column<StageListItem>] {
        STAGE_COLUMNS
    }

    fn form() -> &'static FormSpec {
        &forms::stage::FORM
    }

    fn id(record: &StageListItem) -> DbId {
        record.stage.id
    }

    fn validate(data: &FormData) -> Result<NewStage, FieldErrors> {
        forms::stage::validate(data)
    }

    fn initial(record: &StageListItem) -> FormData {
        forms::stage::initial(&record.stage)
    }

    fn defaults() -> FormData {
        forms::stage::defaults()
    }

    async fn list(pool: &DbPool) -> Result<Vec<StageListItem>, sqlx::Error> {
        StageRepo::list_with_labels(pool).await
    }

    async fn find(pool: &DbPool, id: DbId) -> Result<Option<StageListItem>, sqlx::Error> {
        StageRepo::find_with_labels(pool, id).await
    }

    async fn insert(pool: &DbPool, input: &NewStage) -> Result<StageListItem, sqlx::Error> {
        let stage = StageRepo::create(pool, input).await?;
        written(StageRepo::find_with_labels(pool, stage.id).await?)
    }

    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &NewStage,
    ) -> Result<Option<StageListItem>, sqlx::Error> {
        match StageRepo::update(pool, id, input).await? {
            Some(_) => StageRepo::find_with_labels(pool, id).await,
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub struct SessionScreen;

static SESSION_COLUMNS: &[Column<SessionListItem>] = &[
    Column::<SessionListItem>::new("stage", |s| s.stage_label()),
    Column::<SessionListItem>::new("name", |s| s.session.name.clone()),
    Column::<SessionListItem>::new("session_type", |s| {
        SessionType::label_for(&s.session.session_type)
    }),
    Column::<SessionListItem>::new("status", |s| SessionStatus::label_for(&s.session.status)),
    Column::<SessionListItem>::new("start_time", |s| datetime(s.session.start_time)),
    Column::<SessionListItem>::new("end_time", |s| datetime(s.session.end_time)),
];

#[async_trait]
impl MasterEntity for SessionScreen {
    type Record = SessionListItem;
    type Input = NewSession;

    const META: EntityMeta = EntityMeta {
        slug: "sessions",
        model_name: "Session",
        verbose_name: "Session",
        verbose_name_plural: "Sessions",
        list_title: Some("Sessions"),
        create_title: "Session anlegen",
        update_title: "Session bearbeiten",
        list_display: &["stage", "name", "session_type", "status", "start_time"],
    };

    fn columns() -> &'static [Column<SessionListItem>] {
        SESSION_COLUMNS
    }

    fn form() -> &'static FormSpec {
        &forms::session::FORM
    }

    fn id(record: &SessionListItem) -> DbId {
        record.session.id
    }

    fn validate(data: &FormData) -> Result<NewSession, FieldErrors> {
        forms::session::validate(data)
    }

    fn initial(record: &SessionListItem) -> FormData {
        forms::session::initial(&record.session)
    }

    fn defaults() -> FormData {
        forms::session::defaults()
    }

    async fn list(pool: &DbPool) -> Result<Vec<SessionListItem>, sqlx::Error> {
        SessionRepo::list_with_labels(pool).await
    }

    async fn find(pool: &DbPool, id: DbId) -> Result<Option<SessionListItem>, sqlx::Error> {
        SessionRepo::find_with_labels(pool, id).await
    }

    async fn insert(pool: &DbPool, input: &NewSession) -> Result<SessionListItem, sqlx::Error> {
        let session = SessionRepo::create(pool, input).await?;
        written(SessionRepo::find_with_labels(pool, session.id).await?)
    }

    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &NewSession,
    ) -> Result<Option<SessionListItem>, sqlx::Error> {
        match SessionRepo::update(pool, id, input).await? {
            Some(_) => SessionRepo::find_with_labels(pool, id).await,
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

pub struct GateScreen;

static GATE_COLUMNS: &[Column<GateListItem>] = &[
    Column::<GateListItem>::new("name", |g| g.gate.name.clone()),
    Column::<GateListItem>::new("gate_uid", |g| g.gate.gate_uid.clone()).labelled("Gate UID"),
    Column::<GateListItem>::new("gate_type", |g| GateType::label_for(&g.gate.gate_type)),
    Column::<GateListItem>::new("stage", |g| g.stage_label()),
    Column::<GateListItem>::new("ip_address", |g| text(g.gate.ip_address.as_deref()))
        .labelled("IP Address"),
    Column::<GateListItem>::new("is_enabled", |g| yes_no(g.gate.is_enabled)).labelled("Aktiviert"),
    Column::<GateListItem>::new("last_seen_at", |g| datetime(g.gate.last_seen_at)),
    Column::<GateListItem>::new("fw_version", |g| text(g.gate.fw_version.as_deref()))
        .labelled("Firmware"),
];

#[async_trait]
impl MasterEntity for GateScreen {
    type Record = GateListItem;
    type Input = NewGate;

    const META: EntityMeta = EntityMeta {
        slug: "gates",
        model_name: "Gate",
        verbose_name: "Gate",
        verbose_name_plural: "Gates",
        list_title: Some("Gates"),
        create_title: "Gate anlegen",
        update_title: "Gate bearbeiten",
        list_display: &["name", "gate_uid", "gate_type", "stage", "is_enabled", "last_seen_at"],
    };

    fn columns() -> &'static [Column<GateListItem>] {
        GATE_COLUMNS
    }

    fn form() -> &'static FormSpec {
        &forms::gate::FORM
    }

    fn id(record: &GateListItem) -> DbId {
        record.gate.id
    }

    fn validate(data: &FormData) -> Result<NewGate, FieldErrors> {
        forms::gate::validate(data)
    }

    fn initial(record: &GateListItem) -> FormData {
        forms::gate::initial(&record.gate)
    }

    fn defaults() -> FormData {
        forms::gate::defaults()
    }

    async fn list(pool: &DbPool) -> Result<Vec<GateListItem>, sqlx::Error> {
        GateRepo::list_with_labels(pool).await
    }

    async fn find(pool: &DbPool, id: DbId) -> Result<Option<GateListItem>, sqlx::Error> {
        GateRepo::find_with_labels(pool, id).await
    }

    async fn insert(pool: &DbPool, input: &NewGate) -> Result<GateListItem, sqlx::Error> {
        let gate = GateRepo::create(pool, input).await?;
        written(GateRepo::find_with_labels(pool, gate.id).await?)
    }

    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &NewGate,
    ) -> Result<Option<GateListItem>, sqlx::Error> {
        match GateRepo::update(pool, id, input).await? {
            Some(_) => GateRepo::find_with_labels(pool, id).await,
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Vehicles
// ---------------------------------------------------------------------------

pub struct VehicleScreen;

static VEHICLE_COLUMNS: &[Column<VehicleListItem>] = &[
    Column::<VehicleListItem>::new("driver", |v| v.driver_label.clone()).labelled("Fahrer"),
    Column::<VehicleListItem>::new("name", |v| v.vehicle.name.clone()),
    Column::<VehicleListItem>::new("race_class", |v| text(v.race_class_name.as_deref()))
        .labelled("Klasse"),
    Column::<VehicleListItem>::new("default_start_number", |v| {
        number(v.vehicle.default_start_number)
    }),
    Column::<VehicleListItem>::new("is_active", |v| yes_no(v.vehicle.is_active)).labelled("Aktiv"),
];

#[async_trait]
impl MasterEntity for VehicleScreen {
    type Record = VehicleListItem;
    type Input = NewVehicle;

    const META: EntityMeta = EntityMeta {
        slug: "vehicles",
        model_name: "Vehicle",
        verbose_name: "Fahrzeug",
        verbose_name_plural: "Fahrzeuge",
        list_title: Some("Fahrzeuge"),
        create_title: "Fahrzeug anlegen",
        update_title: "Fahrzeug bearbeiten",
        list_display: &["driver", "name", "race_class", "default_start_number", "is_active"],
    };

    fn columns() -> &'static [Column<VehicleListItem>] {
        VEHICLE_COLUMNS
    }

    fn form() -> &'static FormSpec {
        &forms::vehicle::FORM
    }

    fn id(record: &VehicleListItem) -> DbId {
        record.vehicle.id
    }

    fn validate(data: &FormData) -> Result<NewVehicle, FieldErrors> {
        forms::vehicle::validate(data)
    }

    fn initial(record: &VehicleListItem) -> FormData {
        forms::vehicle::initial(&record.vehicle)
    }

    fn defaults() -> FormData {
        forms::vehicle::defaults()
    }

    async fn list(pool: &DbPool) -> Result<Vec<VehicleListItem>, sqlx::Error> {
        VehicleRepo::list_with_labels(pool).await
    }

    async fn find(pool: &DbPool, id: DbId) -> Result<Option<VehicleListItem>, sqlx::Error> {
        VehicleRepo::find_with_labels(pool, id).await
    }

    async fn insert(pool: &DbPool, input: &NewVehicle) -> Result<VehicleListItem, sqlx::Error> {
        let vehicle = VehicleRepo::create(pool, input).await?;
        written(VehicleRepo::find_with_labels(pool, vehicle.id).await?)
    }

    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &NewVehicle,
    ) -> Result<Option<VehicleListItem>, sqlx::Error> {
        match VehicleRepo::update(pool, id, input).await? {
            Some(_) => VehicleRepo::find_with_labels(pool, id).await,
            None => Ok(None),
        }
    }
}
