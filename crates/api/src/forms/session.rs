use rallycontrol_core::choices::{SessionStatus, SessionType};
use rallycontrol_core::forms::{format_datetime_local, FieldErrors, FormData, FormReader};
use rallycontrol_db::models::session::{NewSession, Session};

use super::{ChoiceSource, FieldSpec, FormSpec, Widget};

pub static FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::required("stage", Widget::ForeignKey(ChoiceSource::Stages)),
        FieldSpec::required("name", Widget::Text(150)),
        FieldSpec::required("session_type", Widget::Select(SessionType::CHOICES)),
        FieldSpec::required("status", Widget::Select(SessionStatus::CHOICES)),
        FieldSpec::optional("start_time", Widget::DateTime),
        FieldSpec::optional("end_time", Widget::DateTime),
    ],
};

pub fn validate(data: &FormData) -> Result<NewSession, FieldErrors> {
    let mut form = FormReader::new(data);
    let stage_id = form.foreign_key("stage", true);
    let name = form.text("name", 150, true);
    let session_type = form.choice("session_type", SessionType::CHOICES, true);
    let status = form.choice("status", SessionStatus::CHOICES, true);
    let start_time = form.datetime("start_time", false);
    let end_time = form.datetime("end_time", false);

    form.finish(|| {
        Some(NewSession {
            stage_id: stage_id?,
            name: name?,
            session_type: session_type?,
            status: status?,
            start_time,
            end_time,
        })
    })
}

pub fn initial(session: &Session) -> FormData {
    let mut data = FormData::new();
    data.set("stage", session.stage_id.to_string());
    data.set("name", &session.name);
    data.set("session_type", &session.session_type);
    data.set("status", &session.status);
    data.set_opt("start_time", session.start_time.map(format_datetime_local));
    data.set_opt("end_time", session.end_time.map(format_datetime_local));
    data
}

pub fn defaults() -> FormData {
    let mut data = FormData::new();
    data.set("session_type", SessionType::default().as_str());
    data.set("status", SessionStatus::default().as_str());
    data
}
