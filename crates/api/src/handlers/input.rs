//! Shared checks for JSON write payloads.

use rallycontrol_core::choices::{
    GateType, OcrStatus, RunStatus, SessionStatus, SessionType, StageMode, StartNumberSource,
};
use rallycontrol_core::error::CoreError;
use rallycontrol_core::roles::VALID_ROLES;
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
use rallycontrol_db::models::vehicle::NewVehicle;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Deserialize a JSON payload into a write DTO, answering 400 on mismatch.
pub fn parse_body<T: DeserializeOwned>(entity: &str, body: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid {entity} payload: {e}")))
}

/// Reject enumerated fields holding values outside their choice set.
pub trait ChoiceFields {
    fn check_choices(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl ChoiceFields for NewRaceClass {}
impl ChoiceFields for NewDriver {}
impl ChoiceFields for NewEvent {}
impl ChoiceFields for NewVehicle {}
impl ChoiceFields for NewPassage {}
impl ChoiceFields for NewCapture {}
impl ChoiceFields for NewLeaderboard {}

impl ChoiceFields for NewStage {
    fn check_choices(&self) -> Result<(), CoreError> {
        StageMode::parse(&self.mode)?;
        Ok(())
    }
}

impl ChoiceFields for NewSession {
    fn check_choices(&self) -> Result<(), CoreError> {
        SessionType::parse(&self.session_type)?;
        SessionStatus::parse(&self.status)?;
        Ok(())
    }
}

impl ChoiceFields for NewGate {
    fn check_choices(&self) -> Result<(), CoreError> {
        GateType::parse(&self.gate_type)?;
        Ok(())
    }
}

impl ChoiceFields for NewRun {
    fn check_choices(&self) -> Result<(), CoreError> {
        RunStatus::parse(&self.status)?;
        StartNumberSource::parse(&self.start_number_source)?;
        Ok(())
    }
}

impl ChoiceFields for NewOcrResult {
    fn check_choices(&self) -> Result<(), CoreError> {
        OcrStatus::parse(&self.status)?;
        Ok(())
    }
}

/// Reject roles other than `admin`, `operator` and `viewer`.
pub fn check_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown role '{role}'. Valid roles: {}",
            VALID_ROLES.join(", ")
        )))
    }
}
