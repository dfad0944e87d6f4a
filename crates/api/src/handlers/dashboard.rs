//! The dashboard landing page.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use rallycontrol_db::repositories::DashboardRepo;
use serde::Serialize;

use crate::error::HtmlResult;
use crate::flash::IncomingFlash;
use crate::middleware::screen::ScreenUser;
use crate::state::AppState;
use crate::templates::{Page, DASHBOARD};

pub const DASHBOARD_TITLE: &str = "RallyControl Dashboard";

#[derive(Debug, Serialize)]
struct Stat {
    label: &'static str,
    value: i64,
}

#[derive(Debug, Serialize)]
struct DashboardBody {
    stats: Vec<Stat>,
}

/// GET /
///
/// Live record counts, recomputed on every request.
pub async fn dashboard(
    State(state): State<AppState>,
    ScreenUser(user): ScreenUser,
    flash: IncomingFlash,
) -> HtmlResult<Response> {
    let counts = DashboardRepo::counts(&state.pool).await?;
    let stats = vec![
        Stat { label: "Events", value: counts.events },
        Stat { label: "Stages", value: counts.stages },
        Stat { label: "Sessions", value: counts.sessions },
        Stat { label: "Fahrer", value: counts.drivers },
        Stat { label: "Fahrzeuge", value: counts.vehicles },
        Stat { label: "Gates", value: counts.gates },
    ];

    let page = Page::new(DASHBOARD_TITLE, "/", Some(&user), &flash, DashboardBody { stats });
    state
        .templates
        .respond(StatusCode::OK, DASHBOARD, &page, &flash)
}
