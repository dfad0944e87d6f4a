//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` input DTO used for inserts and full-replacement updates
//! - For master data, a list item that joins the labels needed for display

use rallycontrol_core::choices::{
    GateType, OcrStatus, RunStatus, SessionStatus, SessionType, StageMode, StartNumberSource,
};

pub mod capture;
pub mod dashboard;
pub mod driver;
pub mod event;
pub mod gate;
pub mod leaderboard;
pub mod ocr_result;
pub mod passage;
pub mod race_class;
pub mod run;
pub mod session;
pub mod stage;
pub mod user;
pub mod vehicle;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_stage_mode() -> String {
    StageMode::default().as_str().to_string()
}

pub(crate) fn default_session_type() -> String {
    SessionType::default().as_str().to_string()
}

pub(crate) fn default_session_status() -> String {
    SessionStatus::default().as_str().to_string()
}

pub(crate) fn default_gate_type() -> String {
    GateType::default().as_str().to_string()
}

pub(crate) fn default_run_status() -> String {
    RunStatus::default().as_str().to_string()
}

pub(crate) fn default_start_number_source() -> String {
    StartNumberSource::default().as_str().to_string()
}

pub(crate) fn default_ocr_status() -> String {
    OcrStatus::default().as_str().to_string()
}
