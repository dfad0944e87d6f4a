//! Route definitions for the server-rendered screens.

use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, screens};
use crate::screens::{
    DriverScreen, EventScreen, GateScreen, MasterEntity, RaceClassScreen, SessionScreen,
    StageScreen, VehicleScreen,
};
use crate::state::AppState;

/// Dashboard plus the list/create/edit screens of every master-data entity.
///
/// ```text
/// GET      /                    -> dashboard
/// GET      /{slug}/             -> list
/// GET|POST /{slug}/new/         -> create_form, create
/// GET|POST /{slug}/{id}/edit/   -> edit_form, update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .merge(master_routes::<DriverScreen>())
        .merge(master_routes::<VehicleScreen>())
        .merge(master_routes::<RaceClassScreen>())
        .merge(master_routes::<EventScreen>())
        .merge(master_routes::<StageScreen>())
        .merge(master_routes::<SessionScreen>())
        .merge(master_routes::<GateScreen>())
}

/// The three screens of one entity under `/{slug}/`.
pub fn master_routes<E: MasterEntity>() -> Router<AppState> {
    let slug = E::META.slug;
    Router::new()
        .route(&format!("/{slug}/"), get(screens::list::<E>))
        .route(
            &format!("/{slug}/new/"),
            get(screens::create_form::<E>).post(screens::create::<E>),
        )
        .route(
            &format!("/{slug}/{{id}}/edit/"),
            get(screens::edit_form::<E>).post(screens::update::<E>),
        )
}
