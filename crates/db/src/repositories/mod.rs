//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Default list ordering lives
//! in the queries here.

pub mod capture_repo;
pub mod console_repo;
pub mod dashboard_repo;
pub mod driver_repo;
pub mod event_repo;
pub mod gate_repo;
pub mod leaderboard_repo;
pub mod ocr_result_repo;
pub mod passage_repo;
pub mod race_class_repo;
pub mod run_repo;
pub mod session_repo;
pub mod stage_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use capture_repo::CaptureRepo;
pub use console_repo::ConsoleRepo;
pub use dashboard_repo::DashboardRepo;
pub use driver_repo::DriverRepo;
pub use event_repo::EventRepo;
pub use gate_repo::GateRepo;
pub use leaderboard_repo::LeaderboardRepo;
pub use ocr_result_repo::OcrResultRepo;
pub use passage_repo::PassageRepo;
pub use race_class_repo::RaceClassRepo;
pub use run_repo::RunRepo;
pub use session_repo::SessionRepo;
pub use stage_repo::StageRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;

/// Delete a row by id from `table`. Returns `true` if a row was removed.
pub(crate) async fn delete_by_id(
    pool: &sqlx::PgPool,
    table: &str,
    id: rallycontrol_core::types::DbId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
